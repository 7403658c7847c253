use serde::Serialize;

use super::Header;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    pub name: String,
    pub description: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn header(&self) -> Header {
        Header::tag()
    }
}
