use serde_json::Value;

use super::{Draft, Valid, BATCH_MAX, CONTENT_MAX, SUMMARY_MAX, TITLE_MAX};

/// Why a batch was rejected.
///
/// The messages are presented to the client. Only the first failing
/// article is reported; `index` is its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
	#[error("artigos must be an array")]
	NotArray,
	#[error("artigos array cannot be empty")]
	Empty,
	#[error("Maximum 100 articles allowed per request")]
	TooLarge,
	#[error("Each article must have title, description, and resumo")]
	MissingField { index: usize },
	#[error("Title must be a string between 1 and 30 characters")]
	InvalidTitle { index: usize },
	#[error("Summary must be a string between 1 and 50 characters")]
	InvalidSummary { index: usize },
	#[error("Description must be a string between 1 and 2000 characters")]
	InvalidDescription { index: usize },
}

impl BatchError {
	/// Position of the offending article, if the batch itself was well formed.
	pub fn index(&self) -> Option<usize> {
		match self {
			Self::NotArray | Self::Empty | Self::TooLarge => None,
			Self::MissingField { index }
			| Self::InvalidTitle { index }
			| Self::InvalidSummary { index }
			| Self::InvalidDescription { index } => Some(*index),
		}
	}
}

/// Validates every article of a batch before any of them is stored.
///
/// Articles are checked in order and the first violation rejects the
/// whole batch.
pub fn validate(artigos: Option<&Value>) -> Result<Vec<Valid>, BatchError> {
	let items = artigos
		.and_then(Value::as_array)
		.ok_or(BatchError::NotArray)?;

	if items.is_empty() {
		return Err(BatchError::Empty);
	}

	if items.len() > BATCH_MAX {
		return Err(BatchError::TooLarge);
	}

	items
		.iter()
		.enumerate()
		.map(|(index, item)| validate_item(index, item))
		.collect()
}

fn validate_item(index: usize, item: &Value) -> Result<Valid, BatchError> {
	let title = item.get("title");
	let content = item.get("description");
	let summary = item.get("resumo").or_else(|| item.get("summary"));

	if ![title, content, summary]
		.into_iter()
		.all(|field| field.is_some_and(is_present))
	{
		return Err(BatchError::MissingField { index });
	}

	Ok(Valid(Draft {
		title: text(title, TITLE_MAX).ok_or(BatchError::InvalidTitle { index })?,
		summary: text(summary, SUMMARY_MAX).ok_or(BatchError::InvalidSummary { index })?,
		content: text(content, CONTENT_MAX).ok_or(BatchError::InvalidDescription { index })?,
	}))
}

/// `null`, `false`, `0` and `""` count as not provided.
fn is_present(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(value) => *value,
		Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
		Value::String(value) => !value.is_empty(),
		Value::Array(..) | Value::Object(..) => true,
	}
}

/// Returns the field if it is a string of 1 to `max` characters.
fn text(value: Option<&Value>, max: usize) -> Option<String> {
	let value = value?.as_str()?;

	(1..=max)
		.contains(&value.chars().count())
		.then(|| value.to_owned())
}
