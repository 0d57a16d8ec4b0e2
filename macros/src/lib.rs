mod route;

use proc_macro::TokenStream;

/// Generates `<name>_docs`, an aide operation transform for the handler.
///
/// The first line of the handler's doc comment becomes the operation summary and
/// the remaining lines its description. `tag` may be repeated, and each
/// `response(status, description, shape)` documents one response.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args.into(), input.into())
		.unwrap_or_else(|error| error.into_compile_error())
		.into()
}
