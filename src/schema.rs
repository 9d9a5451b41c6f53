table! {
    notes (id) {
        id -> Varchar,
        ciphertext -> Text,
        delete_after_read -> Bool,
        created_at -> Timestamp,
        expires_at -> Timestamp,
    }
}
