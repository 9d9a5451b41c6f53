use actix_web::{web, HttpResponse};
use nanoid::nanoid;
use serde_json::json;

use crate::errors::ServerError;
use crate::models::note::{ExpirySelection, NewNote, NoteCreated, NoteMetadata, ReadNote};
use crate::store::NoteStore;
use crate::utils::unix_now;

pub async fn create(
    input: web::Json<NewNote>,
    store: web::Data<dyn NoteStore>,
) -> Result<HttpResponse, ServerError> {
    let selection = ExpirySelection::from_id(&input.expires_in)
        .ok_or_else(|| ServerError::InvalidExpirySelection(input.expires_in.clone()))?;

    if input.ciphertext.trim().is_empty() {
        return Err(ServerError::UserError("ciphertext is empty"));
    }

    let metadata = NoteMetadata {
        expires_at: unix_now() + selection.ttl().as_secs(),
        delete_after_read: selection.delete_after_read(),
    };

    // the id goes out only after the write landed
    let note_id = nanoid!();
    store.put(&note_id, &input.ciphertext, &metadata)?;

    Ok(HttpResponse::Created().json(NoteCreated { id: note_id }))
}

pub async fn read(
    note_id: web::Path<String>,
    input: web::Json<ReadNote>,
    store: web::Data<dyn NoteStore>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();

    let note = match store.get_with_metadata(&note_id)? {
        Some(note) => note,
        None => return Err(ServerError::NotFound(note_id)),
    };

    if note.metadata.delete_after_read {
        if !input.confirm.unwrap_or(false) {
            // ciphertext withheld until an explicit confirm, so URL scanners
            // and prefetchers cannot burn the note
            return Ok(HttpResponse::Ok().json(json!({
                "ciphertext": "",
                "expiration": 0,
                "needs_confirmation": true,
            })));
        }

        // delete first; whoever actually removed the row gets to serve it
        if !store.delete(&note_id)? {
            return Err(ServerError::NotFound(note_id));
        }

        return Ok(HttpResponse::Ok().json(json!({
            "ciphertext": note.ciphertext,
            "expiration": 0,
            "needs_confirmation": false,
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ciphertext": note.ciphertext,
        "expiration": note.metadata.expires_at,
        "needs_confirmation": false,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::crypto::{self, Secret};
    use crate::store::memory::MemStore;
    use crate::store::NoteStore;
    use crate::utils::unix_now;

    macro_rules! note_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from($store.clone() as Arc<dyn NoteStore>))
                    .route("/private-note", web::post().to(super::create))
                    .route("/private-note/{id}", web::post().to(super::read)),
            )
            .await
        };
    }

    macro_rules! create_note {
        ($app:expr, $ciphertext:expr, $expires_in:expr) => {{
            let req = test::TestRequest::post()
                .uri("/private-note")
                .set_json(json!({ "ciphertext": $ciphertext, "expires_in": $expires_in }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            body["id"].as_str().expect("id in create response").to_string()
        }};
    }

    macro_rules! read_note {
        ($app:expr, $id:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri(&format!("/private-note/{}", $id))
                .set_json($body)
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            body
        }};
    }

    #[actix_web::test]
    async fn timed_note_reads_repeatedly_with_stable_expiration() {
        let store = Arc::new(MemStore::new());
        let app = note_app!(store);

        let created_at = unix_now();
        let id = create_note!(app, "opaque-blob", "1");

        let first = read_note!(app, id, json!({}));
        let second = read_note!(app, id, json!({}));

        assert_eq!(first["ciphertext"], "opaque-blob");
        assert_eq!(first["needs_confirmation"], json!(false));
        assert_eq!(first["ciphertext"], second["ciphertext"]);
        assert_eq!(first["expiration"], second["expiration"]);

        let expiration = first["expiration"].as_u64().unwrap();
        assert!(expiration >= created_at + 3_600);
        assert!(expiration <= unix_now() + 3_600);
    }

    #[actix_web::test]
    async fn burn_note_is_gated_then_served_exactly_once() {
        let store = Arc::new(MemStore::new());
        let app = note_app!(store);

        let id = create_note!(app, "burn-blob", "0");

        // unconfirmed reads withhold the ciphertext and change nothing
        for _ in 0..2 {
            let gated = read_note!(app, id, json!({}));
            assert_eq!(gated["needs_confirmation"], json!(true));
            assert_eq!(gated["ciphertext"], "");
        }
        let gated = read_note!(app, id, json!({ "confirm": false }));
        assert_eq!(gated["needs_confirmation"], json!(true));

        // the confirmed read serves and deletes
        let served = read_note!(app, id, json!({ "confirm": true }));
        assert_eq!(served["ciphertext"], "burn-blob");
        assert_eq!(served["expiration"], json!(0));
        assert_eq!(served["needs_confirmation"], json!(false));

        let req = test::TestRequest::post()
            .uri(&format!("/private-note/{}", id))
            .set_json(json!({ "confirm": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(store.is_empty());
    }

    #[actix_web::test]
    async fn unknown_id_is_not_found() {
        let store = Arc::new(MemStore::new());
        let app = note_app!(store);

        let req = test::TestRequest::post()
            .uri("/private-note/no-such-note")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn invalid_expiry_selection_writes_nothing() {
        let store = Arc::new(MemStore::new());
        let app = note_app!(store);

        let req = test::TestRequest::post()
            .uri("/private-note")
            .set_json(json!({ "ciphertext": "blob", "expires_in": "999" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[actix_web::test]
    async fn empty_ciphertext_is_rejected() {
        let store = Arc::new(MemStore::new());
        let app = note_app!(store);

        let req = test::TestRequest::post()
            .uri("/private-note")
            .set_json(json!({ "ciphertext": "  ", "expires_in": "24" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[actix_web::test]
    async fn hello_world_end_to_end() {
        let store = Arc::new(MemStore::new());
        let app = note_app!(store);

        // the client seals before anything touches the server
        let secret = Secret::generate();
        let sealed = crypto::encrypt("hello world", &secret).unwrap();

        let id = create_note!(app, &sealed, "24");
        let response = read_note!(app, id, json!({}));

        assert_eq!(response["needs_confirmation"], json!(false));
        let expiration = response["expiration"].as_u64().unwrap();
        assert!(expiration > unix_now() + 86_000);

        let ciphertext = response["ciphertext"].as_str().unwrap();
        assert_ne!(ciphertext, "hello world");
        assert_eq!(crypto::decrypt(ciphertext, &secret).unwrap(), "hello world");

        // the fragment secret would not open anyone else's note
        assert!(crypto::decrypt(ciphertext, &Secret::generate()).is_err());
    }
}
