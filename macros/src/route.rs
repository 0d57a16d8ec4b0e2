use darling::{ast, FromMeta};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

struct Docs {
	summary: String,
	description: String,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> syn::Result<TokenStream> {
	let args = ast::NestedMeta::parse_meta_list(args)?;
	let args = match RouteArgs::from_list(&args) {
		Ok(args) => args,
		Err(error) => return Ok(error.write_errors()),
	};

	let function = syn::parse2::<syn::ItemFn>(input)?;
	let Docs {
		summary,
		description,
	} = docs(&function)?;

	let name = format_ident!("{}_docs", function.sig.ident);
	let vis = &function.vis;

	let tags = args.tag.iter();
	let responses = args.response.into_iter().map(|response| {
		let status = response.status;
		let shape = response.shape.map_or_else(|| quote!(()), |shape| quote!(#shape));

		match response.description {
			Some(description) => quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			},
			None => quote! {
				.response::<#status, #shape>()
			},
		}
	});

	Ok(quote! {
		#function

		#vis fn #name(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary)
				.description(#description)
				#( .tag(#tags) )*
				#( #responses )*
		}
	})
}

/// Splits the doc comment into its first line and the rest, trimmed like rustdoc does.
fn docs(function: &syn::ItemFn) -> syn::Result<Docs> {
	let lines = function
		.attrs
		.iter()
		.filter(|attr| attr.path().is_ident("doc"))
		.filter_map(|attr| match &attr.meta {
			syn::Meta::NameValue(syn::MetaNameValue {
				value:
					syn::Expr::Lit(syn::ExprLit {
						lit: syn::Lit::Str(line),
						..
					}),
				..
			}) => Some(line.value().trim().to_owned()),
			_ => None,
		})
		.collect::<Vec<_>>();

	let text = lines.join("\n");
	let mut parts = text.trim().splitn(2, '\n');

	let summary = parts
		.next()
		.filter(|line| !line.is_empty())
		.map(str::to_owned)
		.ok_or_else(|| syn::Error::new(function.sig.ident.span(), "route is missing a doc summary"))?;

	let description = parts
		.next()
		.map(|rest| rest.trim().replace('\n', " "))
		.filter(|rest| !rest.is_empty())
		.ok_or_else(|| {
			syn::Error::new(
				function.sig.span(),
				"route is missing a description after its doc summary",
			)
		})?;

	Ok(Docs {
		summary,
		description,
	})
}
