use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const ARTICLE: &str = "Article";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("News Desk")
		.summary("Article publishing service")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::ARTICLE.into(),
			description: Some("Bulk article intake".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::ErrorBody>, _>(|res| {
			res.example(error::ErrorBody {
				error: "error message".into(),
			})
		})
}
