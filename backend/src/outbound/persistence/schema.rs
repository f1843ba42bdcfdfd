//! Diesel table definitions for the ticket desk schema.
//!
//! Kept in step with `backend/migrations` by hand.

diesel::table! {
    /// Registered accounts. `email` is stored normalised and is unique.
    users (id) {
        id -> Uuid,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 60]
        display_name -> Nullable<Varchar>,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets. `status` is constrained to the three workflow states.
    tickets (id) {
        id -> Uuid,
        #[max_length = 120]
        title -> Varchar,
        description -> Text,
        #[max_length = 16]
        status -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments attached to a ticket.
    comments (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tickets -> users (owner_id));
diesel::joinable!(comments -> tickets (ticket_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, tickets, comments);
