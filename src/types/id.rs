use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! string_ids {
    { $( $(#[$meta:meta])* $ident:ident, )* } => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $ident(String);

        impl $ident {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ident {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ident {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    )*};
}

string_ids! {
    /// Store-assigned identifier of a post.
    PostId,
    UserId,
}
