//! Records held by the library store.

use serde::{Deserialize, Serialize};

/// Reading progress above this counts as fully read.
pub const READING_PROGRESS_FULL_CLAMP: f64 = 0.95;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
	#[default]
	Free,
	Supporter,
}

/// Resolved identity of the signed-in reader.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserInfo {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub account_tier: AccountTier,
}

/// A saved article.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Article {
	pub id: String,
	pub url: String,
	pub title: String,
	pub domain: String,
	#[serde(default)]
	pub tags: Vec<String>,
	/// Feed the article came from, if any.
	#[serde(default)]
	pub subscription: Option<String>,
	#[serde(default)]
	pub reading_progress: f64,
	/// Unix seconds.
	pub time_added: i64,
}

impl Article {
	pub fn is_read(&self) -> bool {
		self.reading_progress > READING_PROGRESS_FULL_CLAMP
	}
}

/// A quote the reader highlighted in an article.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Highlight {
	pub id: String,
	pub article_id: String,
	pub text: String,
	pub domain: String,
	/// Unix seconds.
	pub created_at: i64,
}
