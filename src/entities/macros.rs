//! Macros for reducing boilerplate when defining entities
//!
//! Every entity is a flat record of string fields, so the record struct, its
//! request payload and the `Entity`/`Payload` implementations all follow from
//! the field list.

/// Define a record type, its payload type and their trait implementations
///
/// Field attributes are forwarded to the payload struct, where they drive
/// `validator` checks.
///
/// # Example
///
/// ```rust,ignore
/// impl_crud_entity!(
///     Tag, TagPayload,
///     singular: "tag",
///     plural: "tags",
///     label: "Tag",
///     unique: [name],
///     {
///         #[validate(length(min = 1, max = 40))]
///         name,
///         color,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_crud_entity {
    (
        $type:ident, $payload:ident,
        singular: $singular:literal,
        plural: $plural:literal,
        label: $label:literal,
        unique: [$($unique:ident),* $(,)?],
        {
            $(
                $(#[$meta:meta])*
                $field:ident
            ),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Storage-assigned identifier
            pub id: $crate::core::entity::RecordId,
            $(
                pub $field: String,
            )+
        }

        #[derive(Debug, Clone, Default, ::serde::Deserialize, ::validator::Validate)]
        pub struct $payload {
            $(
                $(#[$meta])*
                #[serde(default)]
                pub $field: Option<String>,
            )+
        }

        impl $crate::core::entity::Payload for $payload {
            fn to_fields(&self) -> $crate::core::entity::FieldSet {
                let mut fields = $crate::core::entity::FieldSet::new();
                $(
                    if let Some(value) = &self.$field {
                        fields.insert(stringify!($field), value.clone());
                    }
                )+
                fields
            }
        }

        impl $crate::core::entity::Entity for $type {
            type Payload = $payload;

            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn label() -> &'static str {
                $label
            }

            fn fields() -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }

            fn unique_fields() -> &'static [&'static str] {
                &[$(stringify!($unique)),*]
            }

            fn id(&self) -> &$crate::core::entity::RecordId {
                &self.id
            }

            fn field_value(&self, field: &str) -> Option<&str> {
                $(
                    if field == stringify!($field) {
                        return Some(self.$field.as_str());
                    }
                )+
                None
            }

            fn from_fields(
                id: $crate::core::entity::RecordId,
                fields: &$crate::core::entity::FieldSet,
            ) -> Option<Self> {
                Some(Self {
                    id,
                    $(
                        $field: fields.get(stringify!($field))?.clone(),
                    )+
                })
            }
        }
    };
}
