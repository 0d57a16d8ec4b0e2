use serde::Deserialize;
use validator::Validate;

use super::{Draft, Valid};

/// An article submitted through the HTML form.
///
/// Every field may be missing. The summary and content are sent as
/// `resumo` and `description`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct Submission {
	#[validate(required, length(min = 1, max = 30))]
	pub title: Option<String>,
	#[serde(rename = "resumo")]
	#[validate(required, length(min = 1, max = 50))]
	pub summary: Option<String>,
	#[serde(rename = "description")]
	#[validate(required, length(min = 1, max = 2000))]
	pub content: Option<String>,
}

impl Submission {
	/// Checks the submission as a whole.
	///
	/// On failure the submitted values are handed back so the form can be
	/// shown again, with missing fields left empty.
	pub fn check(self) -> Result<Valid, Draft> {
		let valid = self.validate().is_ok();
		let draft = Draft {
			title: self.title.unwrap_or_default(),
			summary: self.summary.unwrap_or_default(),
			content: self.content.unwrap_or_default(),
		};

		if valid {
			Ok(Valid(draft))
		} else {
			Err(draft)
		}
	}
}
