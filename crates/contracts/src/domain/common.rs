use uuid::Uuid;

/// Typed identifier backed by a UUID.
///
/// Every aggregate gets its own newtype id so form ids, response ids and
/// template ids cannot be mixed up at compile time.
pub trait AggregateId: Sized {
    fn as_string(&self) -> String;
    fn from_string(s: &str) -> Result<Self, String>;
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(value: Uuid) -> Self {
                Self(value)
            }

            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl AggregateId for $name {
            fn as_string(&self) -> String {
                self.0.to_string()
            }

            fn from_string(s: &str) -> Result<Self, String> {
                Uuid::parse_str(s)
                    .map($name::new)
                    .map_err(|e| format!("Invalid UUID: {}", e))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of a form
    FormId
);
uuid_id!(
    /// Unique identifier of a submitted response
    ResponseId
);
uuid_id!(
    /// Unique identifier of a form template
    TemplateId
);
