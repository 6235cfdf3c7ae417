use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;

use crate::error::DeskError;

pub const DESKBOX_DIR: &str = ".deskbox";

/// Setting key that turns on the automated greeting after an accept.
pub const GREETING_SETTING_KEY: &str = "sendGreetingAccepted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Pending,
    Open,
    Closed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Pending => write!(f, "pending"),
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TicketStatus::Pending),
            "open" => Ok(TicketStatus::Open),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(DeskError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_STATUSES: &[&str] = &["pending", "open", "closed"];

/// Role of the authenticated agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Admin,
    #[default]
    User,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Admin => write!(f, "admin"),
            Profile::User => write!(f, "user"),
        }
    }
}

impl FromStr for Profile {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Profile::Admin),
            "user" => Ok(Profile::User),
            _ => Err(DeskError::Config(format!(
                "unknown profile '{s}', expected 'admin' or 'user'"
            ))),
        }
    }
}

/// The agent operating the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile: Profile,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.profile == Profile::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A WhatsApp connection the ticket arrived on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    pub uuid: String,
    pub status: TicketStatus,

    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub queue_id: Option<u64>,
    #[serde(default)]
    pub whatsapp_id: Option<u64>,

    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub queue: Option<Queue>,
    #[serde(default)]
    pub whatsapp: Option<Channel>,

    #[serde(default)]
    pub contact: Contact,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub unread_messages: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last_message: String,

    pub updated_at: Timestamp,

    #[serde(default)]
    pub is_group: bool,

    #[serde(default)]
    pub chatbot: bool,
}

/// A `{key, value}` pair from `GET /settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// Look up a setting value by key
pub fn setting_value<'a>(settings: &'a [Setting], key: &str) -> Option<&'a str> {
    settings
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.value.as_str())
}

/// A message in a ticket's conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default)]
    pub from_me: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub has_more: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
