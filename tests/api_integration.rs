use mockito::Matcher;
use pot_admin::api::PotApi;
use pot_admin::config::{BackendKind, NetworkConfig};
use pot_admin::internal::form::{FormField, ValidationRules};
use pot_admin::internal::manager::PotManager;
use pot_admin::internal::modal::ConfirmChoice;
use pot_admin::internal::notification::NotificationType;
use pot_admin::internal::sync::SyncBackend;
use serde_json::json;

const LIST_BODY: &str = r#"{"pots":[
    {"_id":"p1","name":"Vase","category":"Clay","price":120,"description":"Tall","image":"http://img.example/vase.png"},
    {"_id":"p2","name":"Bowl","category":"Stone","price":"80","description":"Wide","image":"http://img.example/bowl.png"}
]}"#;

fn manager_for(server: &mockito::Server) -> PotManager {
    let config = NetworkConfig {
        base_url: format!("{}/api/v1", server.url()),
        ..Default::default()
    };
    let api = PotApi::new(&config).expect("valid base url");
    let rules = ValidationRules {
        required: FormField::required_for(BackendKind::Remote),
        ..Default::default()
    };
    PotManager::new(SyncBackend::Remote(api), rules)
}

fn fill_form(manager: &mut PotManager) {
    manager.form.set(FormField::Name, "Planter");
    manager.form.set(FormField::Category, "Ceramic");
    manager.form.set(FormField::Price, "250");
    manager.form.set(FormField::Description, "Glazed");
    manager.form.set(FormField::Image, "http://img.example/planter.png");
}

#[tokio::test]
async fn test_initial_load_populates_store() {
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LIST_BODY)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let effects = manager.refresh();
    let notices = manager.drive(effects).await;

    list.assert_async().await;
    assert!(notices.is_empty());
    assert_eq!(manager.store.len(), 2);
    assert_eq!(manager.store.get("p2").map(|p| p.name.as_str()), Some("Bowl"));
    assert!(!manager.is_fetching());
}

#[tokio::test]
async fn test_create_success_refetches_once() {
    let mut server = mockito::Server::new_async().await;
    // Seed load plus exactly one follow-up after the create
    let list = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_body(LIST_BODY)
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/api/v1/potAdmin")
        .match_body(Matcher::PartialJson(json!({
            "name": "Planter",
            "category": "Ceramic",
            "price": "250",
            "description": "Glazed",
            "image": "http://img.example/planter.png"
        })))
        .with_status(200)
        .with_body(r#"{"success":true,"message":"Pot added"}"#)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let effects = manager.refresh();
    manager.drive(effects).await;

    manager.open_create();
    fill_form(&mut manager);
    let effects = manager.save();
    let notices = manager.drive(effects).await;

    create.assert_async().await;
    list.assert_async().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Pot added!");
    assert_eq!(notices[0].notification_type, NotificationType::Info);
    assert!(!manager.modal.is_open());
    assert!(manager.form.is_empty());
    assert_eq!(manager.store.in_flight(), 0);
}

#[tokio::test]
async fn test_create_rejection_keeps_form_and_skips_refetch() {
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_body(LIST_BODY)
        .expect(1)
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/api/v1/potAdmin")
        .with_status(400)
        .with_body(r#"{"success":false,"message":"Duplicate pot"}"#)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let effects = manager.refresh();
    manager.drive(effects).await;

    manager.open_create();
    fill_form(&mut manager);
    let effects = manager.save();
    let notices = manager.drive(effects).await;

    list.assert_async().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Duplicate pot");
    assert_eq!(notices[0].notification_type, NotificationType::Warning);
    assert!(manager.modal.is_open());
    assert_eq!(manager.form.value(FormField::Name), "Planter");
    assert!(!manager.is_submitting());
}

#[tokio::test]
async fn test_rejection_without_message_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_body(LIST_BODY)
        .create_async()
        .await;
    let _delete = server
        .mock("DELETE", "/api/v1/deletePot/p1")
        .with_status(200)
        .with_body(r#"{"success":false}"#)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let effects = manager.refresh();
    manager.drive(effects).await;

    manager.request_delete("p1");
    let effects = manager.resolve_delete(ConfirmChoice::Confirm);
    let notices = manager.drive(effects).await;

    assert_eq!(notices[0].message, "Error deleting pot");
    assert!(manager.store.get("p1").is_some());
    assert!(manager.store.pending("p1").is_none());
}

#[tokio::test]
async fn test_edit_sends_prepopulated_record() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_body(LIST_BODY)
        .create_async()
        .await;
    // Only the category changes; the rest must come from the loaded record
    let update = server
        .mock("PUT", "/api/v1/updatePot/p2")
        .match_body(Matcher::PartialJson(json!({
            "name": "Bowl",
            "category": "Granite",
            "description": "Wide",
            "image": "http://img.example/bowl.png"
        })))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let effects = manager.refresh();
    manager.drive(effects).await;

    manager.open_edit("p2");
    assert_eq!(manager.form.value(FormField::Price), "80");
    manager.form.set(FormField::Category, "Granite");
    let effects = manager.save();
    let notices = manager.drive(effects).await;

    update.assert_async().await;
    assert_eq!(notices[0].message, "Pot updated!");
    assert!(!manager.modal.is_open());
}

#[tokio::test]
async fn test_delete_success_removes_record() {
    let mut server = mockito::Server::new_async().await;
    let _seed = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_body(LIST_BODY)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let effects = manager.refresh();
    manager.drive(effects).await;
    assert_eq!(manager.store.len(), 2);

    // After the delete the server only reports the survivor
    server.reset_async().await;
    let _after = server
        .mock("GET", "/api/v1/getAllPots")
        .with_status(200)
        .with_body(r#"{"pots":[{"_id":"p2","name":"Bowl","category":"Stone"}]}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v1/deletePot/p1")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    manager.request_delete("p1");
    let effects = manager.resolve_delete(ConfirmChoice::Confirm);
    assert_eq!(manager.store.pending("p1").map(|op| op.label()), Some("deleting…"));
    let notices = manager.drive(effects).await;

    delete.assert_async().await;
    assert_eq!(notices[0].message, "Pot deleted!");
    assert_eq!(manager.store.len(), 1);
    assert!(manager.store.get("p1").is_none());
}

#[tokio::test]
async fn test_unreachable_server_reports_error() {
    let config = NetworkConfig {
        base_url: "http://127.0.0.1:1/api/v1/".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let api = PotApi::new(&config).expect("valid base url");
    let rules = ValidationRules {
        required: FormField::required_for(BackendKind::Remote),
        ..Default::default()
    };
    let mut manager = PotManager::new(SyncBackend::Remote(api), rules);

    let effects = manager.refresh();
    let notices = manager.drive(effects).await;

    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert!(manager.store.is_empty());
    assert!(!manager.is_fetching());
}
