//! The two record types served by autostack

pub mod macros;

crate::impl_crud_entity!(
    User, UserPayload,
    singular: "user",
    plural: "users",
    label: "User",
    unique: [username, email],
    {
        #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
        username,
        #[validate(
            email(message = "must be a valid email address"),
            length(max = 120, message = "must be at most 120 characters")
        )]
        email,
    }
);

crate::impl_crud_entity!(
    Note, NotePayload,
    singular: "note",
    plural: "notes",
    label: "Note",
    unique: [title],
    {
        #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
        title,
        #[validate(length(min = 1, message = "must not be empty"))]
        content,
    }
);
