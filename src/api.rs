//! Gofile wire types and the response envelope every endpoint answers with.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

pub const GET_SERVER: &str = "getServer";
pub const GET_ACCOUNT_DETAILS: &str = "getAccountDetails";
pub const CREATE_FOLDER: &str = "createFolder";
pub const SET_OPTION: &str = "setOption";
pub const GET_CONTENT: &str = "getContent";
pub const COPY_CONTENT: &str = "copyContent";
pub const DELETE_CONTENT: &str = "deleteContent";
pub const UPLOAD_FILE: &str = "uploadFile";

pub const STATUS_OK: &str = "ok";
pub const STATUS_WRONG_TOKEN: &str = "error-wrongToken";

const UNKNOWN_REASON: &str = "Response status is not ok and reason is unknown";

/// `{status, data?}` as returned by every Gofile endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: String,
    /// `None` only when the field is absent; `"data": null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    pub data: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Envelope {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The reason part of an `error-<reason>` status.
    pub fn error_reason(&self) -> &str {
        self.status.split('-').nth(1).unwrap_or(UNKNOWN_REASON)
    }

    pub fn into_data(self) -> Result<Value> {
        if self.is_ok() {
            self.data.ok_or(Error::MissingField("data"))
        } else {
            Err(Error::ResponseError(self.error_reason().to_owned()))
        }
    }
}

/// Returns `data` of an `ok` response, otherwise a [`Error::ResponseError`]
/// carrying the reason taken from the status tag.
pub fn unwrap_response(response: Value) -> Result<Value> {
    let envelope: Envelope = serde_json::from_value(response)?;
    envelope.into_data()
}

/// Reads a string field out of an unwrapped `data` object.
pub(crate) fn str_field<'a>(data: &'a Value, field: &'static str) -> Result<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .ok_or(Error::MissingField(field))
}

/// Options accepted by the `setOption` endpoint.
///
/// * `Public`: `"true"` or `"false"`.
/// * `Password`: the password.
/// * `Description`: the description.
/// * `Expire`: expiration date as a unix timestamp.
/// * `Tags`: comma separated list of tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOption {
    Public,
    Password,
    Description,
    Expire,
    Tags,
}

impl ContentOption {
    pub const ALL: [ContentOption; 5] = [
        ContentOption::Public,
        ContentOption::Password,
        ContentOption::Description,
        ContentOption::Expire,
        ContentOption::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentOption::Public => "public",
            ContentOption::Password => "password",
            ContentOption::Description => "description",
            ContentOption::Expire => "expire",
            ContentOption::Tags => "tags",
        }
    }
}

impl fmt::Display for ContentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| Error::InvalidOption(s.to_owned()))
    }
}
