use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use fundwell_api::session::{FLASH_COOKIE, SESSION_COOKIE, create_token};
use fundwell_api::{AppState, AppStateInner, router};
use fundwell_core::{PasswordScheme, Workflows};
use fundwell_db::Database;
use fundwell_types::api::NewCampaign;
use fundwell_types::{Money, Principal, RequestStatus, Role};

const SECRET: &str = "test-secret";
const BOUNDARY: &str = "fundwell-boundary";

struct PlainScheme;

impl PasswordScheme for PlainScheme {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain:{}", password))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        stored.strip_prefix("plain:") == Some(password)
    }
}

struct TestApp {
    db: Arc<Database>,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let state = Arc::new(AppStateInner {
            workflows: Workflows::new(db.clone(), Arc::new(PlainScheme)),
            session_secret: SECRET.into(),
            session_ttl: chrono::Duration::hours(1),
        });
        Self { db, state }
    }

    fn router(&self) -> Router {
        router(self.state.clone())
    }

    async fn send(&self, req: Request<Body>) -> Response {
        self.router().oneshot(req).await.unwrap()
    }

    /// Campaign creators come with an approved request.
    fn user(&self, username: &str, role: Role) -> Principal {
        let id = if role == Role::CampaignCreator {
            let (id, request) = self.db.register_campaign_creator(username, "plain:pw", b"%PDF").unwrap();
            self.db.set_creator_request_status(request, RequestStatus::Approved).unwrap();
            id
        } else {
            self.db.create_user(username, "plain:pw", role).unwrap()
        };
        Principal {
            id,
            username: username.into(),
            role,
        }
    }

    fn campaign(&self, creator: &Principal, approved: bool) -> (i64, i64) {
        let ids = self
            .db
            .create_campaign(
                creator.id,
                &NewCampaign {
                    title: "Clean water".into(),
                    description: "wells".into(),
                    goal: Money::from_cents(100_000),
                    end_date: NaiveDate::from_ymd_opt(2032, 1, 1).unwrap(),
                    iban: "PT50000201231234567890154".into(),
                    media: None,
                },
            )
            .unwrap();
        if approved {
            let admin = self.db.create_user(&format!("validator-{}", ids.0), "x", Role::Administrator).unwrap();
            self.db.decide_campaign_request(ids.1, RequestStatus::Approved, admin).unwrap();
        }
        ids
    }
}

fn cookie(principal: &Principal) -> String {
    let token = create_token(SECRET, principal, chrono::Duration::hours(1)).unwrap();
    format!("{}={}", SESSION_COOKIE, token)
}

fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    send_empty("GET", uri, session)
}

fn send_empty(method: &str, uri: &str, session: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(c) = session {
        req = req.header(header::COOKIE, c);
    }
    req.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, session: Option<&str>) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = session {
        req = req.header(header::COOKIE, c);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

/// `files` are `(field, filename, content type, bytes)`.
fn post_multipart(
    uri: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str, &[u8])],
    session: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(c) = session {
        req = req.header(header::COOKIE, c);
    }
    req.body(Body::from(body)).unwrap()
}

fn location(res: &Response) -> &str {
    res.headers()[header::LOCATION].to_str().unwrap()
}

/// Value of a cookie set by the response, skipping removals.
fn set_cookie(res: &Response, name: &str) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.strip_prefix(&format!("{}=", name)).map(str::to_string))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .find(|v| !v.is_empty())
}

fn flash(res: &Response) -> Option<String> {
    let encoded = set_cookie(res, FLASH_COOKIE)?;
    String::from_utf8(URL_SAFE_NO_PAD.decode(encoded).ok()?).ok()
}

async fn json(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// -- Health --

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new();
    let res = app.send(get("/health", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

// -- Identity --

#[tokio::test]
async fn campaign_form_is_for_campaign_creators_only() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let others = [
        Some(cookie(&app.user("donor", Role::Donor))),
        Some(cookie(&app.user("admin", Role::Administrator))),
        Some(cookie(&app.user("root", Role::RootAdministrator))),
        None,
    ];

    for session in &others {
        let res = app.send(get("/campaigns/create", session.as_deref())).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/login");

        let res = app
            .send(post_form("/campaigns/create", "title=x", session.as_deref()))
            .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/login");
        assert!(flash(&res).is_some());
    }

    let res = app.send(get("/campaigns/create", Some(&cookie(&creator)))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn sessions_follow_the_stored_account() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let session = cookie(&creator);

    let res = app.send(get("/campaigns/create", Some(&session))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let request = app.db.get_creator_request_for_user(creator.id).unwrap().unwrap();
    app.db.set_creator_request_status(request.id, RequestStatus::Rejected).unwrap();
    let res = app.send(get("/campaigns/create", Some(&session))).await;
    assert_eq!(location(&res), "/login");

    let donor = app.user("donor", Role::Donor);
    let session = cookie(&donor);
    app.db.delete_user(donor.id).unwrap();
    let res = app.send(get("/profile", Some(&session))).await;
    assert_eq!(location(&res), "/login");
}

#[tokio::test]
async fn login_routes_by_role() {
    let app = TestApp::new();
    app.user("donna", Role::Donor);
    app.user("ada", Role::Administrator);

    let res = app.send(post_form("/login", "username=donna&password=pw", None)).await;
    assert_eq!(location(&res), "/campaigns");
    assert!(set_cookie(&res, SESSION_COOKIE).is_some());

    let res = app.send(post_form("/login", "username=ada&password=pw", None)).await;
    assert_eq!(location(&res), "/requests/campaigns");

    let res = app.send(post_form("/login", "username=ada&password=nope", None)).await;
    assert_eq!(location(&res), "/login");
    assert_eq!(flash(&res).as_deref(), Some("User not found."));
    assert!(set_cookie(&res, SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn creator_login_follows_request_status() {
    let app = TestApp::new();
    app.db.register_campaign_creator("pat", "plain:pw", b"%PDF").unwrap();
    let (_, approved) = app.db.register_campaign_creator("abe", "plain:pw", b"%PDF").unwrap();
    app.db.set_creator_request_status(approved, RequestStatus::Approved).unwrap();

    let res = app.send(post_form("/login", "username=pat&password=pw", None)).await;
    assert_eq!(location(&res), "/login");
    assert!(flash(&res).unwrap().contains("wasn't validated yet"));
    assert!(set_cookie(&res, SESSION_COOKIE).is_none());

    let res = app.send(post_form("/login", "username=abe&password=pw", None)).await;
    assert_eq!(location(&res), "/campaigns/create");
    assert!(set_cookie(&res, SESSION_COOKIE).is_some());
}

#[tokio::test]
async fn rejected_creator_is_destroyed_on_login() {
    let app = TestApp::new();
    let (user_id, request) = app.db.register_campaign_creator("rex", "plain:pw", b"%PDF").unwrap();
    app.db.set_creator_request_status(request, RequestStatus::Rejected).unwrap();

    let res = app.send(post_form("/login", "username=rex&password=pw", None)).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/login");
    assert!(flash(&res).unwrap().contains("rejected"));
    assert!(set_cookie(&res, SESSION_COOKIE).is_none());

    assert!(app.db.get_user_by_id(user_id).unwrap().is_none());
    assert!(app.db.get_creator_request_for_user(user_id).unwrap().is_none());
}

#[tokio::test]
async fn register_campaign_creator_with_document() {
    let app = TestApp::new();
    let fields = [
        ("username", "cleo"),
        ("password", "pw"),
        ("password_confirmation", "pw"),
        ("role", "campaign_creator"),
    ];

    let res = app
        .send(post_multipart(
            "/register",
            &fields,
            &[("id_document", "id.png", "image/png", b"png")],
            None,
        ))
        .await;
    assert_eq!(location(&res), "/register");
    assert_eq!(
        flash(&res).as_deref(),
        Some("Invalid file type. Allowed types: application/pdf.")
    );
    assert!(app.db.get_user_by_username("cleo").unwrap().is_none());

    let res = app
        .send(post_multipart(
            "/register",
            &fields,
            &[("id_document", "id.pdf", "application/pdf", b"%PDF-1.4")],
            None,
        ))
        .await;
    assert_eq!(location(&res), "/login");

    let user = app.db.get_user_by_username("cleo").unwrap().unwrap();
    let request = app.db.get_creator_request_for_user(user.id).unwrap().unwrap();
    assert_eq!(request.status, "Pending");
}

#[tokio::test]
async fn register_validation_goes_back_to_the_form() {
    let app = TestApp::new();
    app.user("taken", Role::Donor);

    let cases = [
        (vec![("username", "a"), ("password", "pw")], "Empty fields."),
        (
            vec![
                ("username", "a"),
                ("password", "pw"),
                ("password_confirmation", "pX"),
                ("role", "donor"),
            ],
            "Different passwords.",
        ),
        (
            vec![
                ("username", "taken"),
                ("password", "pw"),
                ("password_confirmation", "pw"),
                ("role", "donor"),
            ],
            "Username already taken.",
        ),
        (
            vec![
                ("username", "newbie"),
                ("password", "pw"),
                ("password_confirmation", "pw"),
                ("role", "campaign_creator"),
            ],
            "No file uploaded.",
        ),
    ];

    for (fields, message) in cases {
        let res = app.send(post_multipart("/register", &fields, &[], None)).await;
        assert_eq!(location(&res), "/register");
        assert_eq!(flash(&res).as_deref(), Some(message));
    }
    assert!(app.db.get_user_by_username("newbie").unwrap().is_none());
}

#[tokio::test]
async fn uploads_past_the_body_limit_go_back_with_a_message() {
    let app = TestApp::new();
    let oversized = vec![b'x'; 16 * 1024 * 1024];

    let res = app
        .send(post_multipart(
            "/register",
            &[
                ("username", "cleo"),
                ("password", "pw"),
                ("password_confirmation", "pw"),
                ("role", "campaign_creator"),
            ],
            &[("id_document", "id.pdf", "application/pdf", &oversized)],
            None,
        ))
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/register");
    assert_eq!(
        flash(&res).as_deref(),
        Some("File is too large. Max allowed size is 5 MB.")
    );
    assert!(app.db.get_user_by_username("cleo").unwrap().is_none());

    let creator = app.user("maker", Role::CampaignCreator);
    let res = app
        .send(post_multipart(
            "/campaigns/create",
            &[("title", "Roof")],
            &[("media", "roof.png", "image/png", &oversized)],
            Some(&cookie(&creator)),
        ))
        .await;
    assert_eq!(location(&res), "/campaigns/create");
    assert_eq!(
        flash(&res).as_deref(),
        Some("File is too large. Max allowed size is 5 MB.")
    );
}

#[tokio::test]
async fn flash_is_shown_on_the_next_page() {
    let app = TestApp::new();
    let res = app.send(post_form("/login", "username=ghost&password=pw", None)).await;
    let value = set_cookie(&res, FLASH_COOKIE).unwrap();

    let page = app
        .send(get("/login", Some(&format!("{}={}", FLASH_COOKIE, value))))
        .await;
    assert_eq!(page.status(), StatusCode::OK);
    assert_eq!(json(page).await["message"], "User not found.");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = TestApp::new();
    let donor = app.user("d", Role::Donor);

    let res = app.send(get("/logout", Some(&cookie(&donor)))).await;
    assert_eq!(location(&res), "/login");
    let cleared = res
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|v| v.to_str().unwrap().starts_with(&format!("{}=;", SESSION_COOKIE)));
    assert!(cleared);
}

#[tokio::test]
async fn admin_creation_is_root_only() {
    let app = TestApp::new();
    let admin = app.user("ada", Role::Administrator);
    let root = app.user("root", Role::RootAdministrator);
    let body = "username=newadmin&password=pw&password_confirmation=pw";

    let res = app.send(get("/register/admin", Some(&cookie(&admin)))).await;
    assert_eq!(location(&res), "/login");
    let res = app.send(post_form("/register/admin", body, Some(&cookie(&admin)))).await;
    assert_eq!(location(&res), "/login");
    assert!(app.db.get_user_by_username("newadmin").unwrap().is_none());

    let res = app.send(post_form("/register/admin", body, Some(&cookie(&root)))).await;
    assert_eq!(location(&res), "/register/admin");
    let created = app.db.get_user_by_username("newadmin").unwrap().unwrap();
    assert_eq!(created.role, "administrator");
}

#[tokio::test]
async fn profile_update_reissues_the_session() {
    let app = TestApp::new();
    let donor = app.user("old", Role::Donor);
    app.user("other", Role::Donor);
    let session = cookie(&donor);

    let res = app
        .send(post_multipart(
            "/profile",
            &[
                ("new_username", "other"),
                ("new_password", "pw2"),
                ("new_password_confirmation", "pw2"),
            ],
            &[],
            Some(&session),
        ))
        .await;
    assert_eq!(location(&res), "/profile");
    assert_eq!(flash(&res).as_deref(), Some("Username already in use"));

    let res = app
        .send(post_multipart(
            "/profile",
            &[
                ("new_username", "new"),
                ("new_password", "pw2"),
                ("new_password_confirmation", "pw2"),
            ],
            &[("picture", "me.png", "image/png", b"\x89PNG")],
            Some(&session),
        ))
        .await;
    assert_eq!(location(&res), "/profile");
    let token = set_cookie(&res, SESSION_COOKIE).unwrap();

    let page = app
        .send(get("/profile", Some(&format!("{}={}", SESSION_COOKIE, token))))
        .await;
    let body = json(page).await;
    assert_eq!(body["user"]["username"], "new");
    assert!(body["user"]["picture"].is_string());
}

// -- Campaigns --

#[tokio::test]
async fn creating_a_campaign_pairs_a_pending_request() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let session = cookie(&creator);

    let res = app
        .send(post_multipart(
            "/campaigns/create",
            &[
                ("title", "School roof"),
                ("description", "before winter"),
                ("goal", "1500.75"),
                ("endDate", "2031-10-01"),
                ("iban", "GB29NWBK60161331926819"),
            ],
            &[("media", "roof.jpg", "image/jpeg", b"\xff\xd8\xff")],
            Some(&session),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/campaigns");

    let owned = json(app.send(get("/campaigns/owned", Some(&session))).await).await;
    let owned = owned.as_array().unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0]["status"], "Pending");
    assert_eq!(owned[0]["goal"], "1500.75");

    // Not public yet.
    let listing = json(app.send(get("/campaigns", None)).await).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn invalid_campaign_fields_return_to_the_form() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);

    let res = app
        .send(post_multipart(
            "/campaigns/create",
            &[
                ("title", "Roof"),
                ("description", "d"),
                ("goal", "-4"),
                ("endDate", "2031-10-01"),
                ("iban", "GB29NWBK60161331926819"),
            ],
            &[],
            Some(&cookie(&creator)),
        ))
        .await;
    assert_eq!(location(&res), "/campaigns/create");
    assert!(flash(&res).is_some());

    let res = app
        .send(post_multipart(
            "/campaigns/create",
            &[
                ("title", "Roof"),
                ("description", "d"),
                ("goal", "1000000000000000000000000000"),
                ("endDate", "2031-10-01"),
                ("iban", "GB29NWBK60161331926819"),
            ],
            &[],
            Some(&cookie(&creator)),
        ))
        .await;
    assert_eq!(location(&res), "/campaigns/create");
    assert_eq!(flash(&res).as_deref(), Some("Goal: Amount is too large."));
    assert!(app.db.list_owned_campaigns(creator.id).unwrap().is_empty());
}

#[tokio::test]
async fn listing_counts_only_approved_campaigns() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    for i in 0..8 {
        app.campaign(&creator, i % 4 != 0);
    }

    let first = json(app.send(get("/campaigns", None)).await).await;
    assert_eq!(first["total"], 6);
    assert_eq!(first["total_pages"], 1);
    assert_eq!(first["campaigns"].as_array().unwrap().len(), 6);

    let second = json(app.send(get("/campaigns/page/1", None)).await).await;
    assert!(second["campaigns"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn pending_campaign_detail_is_hidden_from_the_public() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let (id, _) = app.campaign(&creator, false);

    let res = app.send(get(&format!("/campaigns/{}", id), None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.send(get(&format!("/campaigns/{}", id), Some(&cookie(&creator)))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn campaign_deletion_lands_by_role() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let donor = app.user("donor", Role::Donor);
    let admin = app.user("ada", Role::Administrator);
    let (first, _) = app.campaign(&creator, true);
    let (second, _) = app.campaign(&creator, true);

    let res = app.send(get(&format!("/campaigns/{}/delete", first), Some(&cookie(&donor)))).await;
    assert_eq!(location(&res), "/campaigns");
    assert!(app.db.get_campaign(first).unwrap().is_some());

    let res = app.send(get(&format!("/campaigns/{}/delete", first), Some(&cookie(&creator)))).await;
    assert_eq!(location(&res), "/campaigns/owned");
    assert!(app.db.get_campaign(first).unwrap().is_none());

    let res = app.send(get(&format!("/campaigns/{}/delete", second), Some(&cookie(&admin)))).await;
    assert_eq!(location(&res), "/reports");
    assert!(app.db.get_campaign(second).unwrap().is_none());

    let res = app.send(get(&format!("/campaigns/{}/delete", second), None)).await;
    assert_eq!(location(&res), "/login");
}

// -- Campaign review --

#[tokio::test]
async fn approval_updates_validator_and_status() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let admin = app.user("ada", Role::Administrator);
    let (id, request) = app.campaign(&creator, false);
    let session = cookie(&admin);

    let pending = json(app.send(get("/requests/campaigns", Some(&session))).await).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let res = app
        .send(post_form(
            "/requests/campaigns",
            &format!("campaignRequestId={}&status=Approved", request),
            Some(&session),
        ))
        .await;
    assert_eq!(location(&res), "/requests/campaigns");

    let row = app.db.get_campaign(id).unwrap().unwrap();
    assert_eq!(row.status, "Approved");
    assert_eq!(row.campaign.validator_id, Some(admin.id));

    let review = json(
        app.send(get(&format!("/requests/campaigns/{}", request), Some(&session)))
            .await,
    )
    .await;
    assert_eq!(review["status"], "Approved");
}

#[tokio::test]
async fn invalid_decision_is_rejected_without_writes() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let admin = app.user("ada", Role::Administrator);
    let (id, request) = app.campaign(&creator, false);

    let res = app
        .send(post_form(
            "/requests/campaigns",
            &format!("campaignRequestId={}&status=Maybe", request),
            Some(&cookie(&admin)),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["error"], "Invalid status value");

    let row = app.db.get_campaign(id).unwrap().unwrap();
    assert_eq!(row.status, "Pending");
    assert_eq!(row.campaign.validator_id, None);
}

#[tokio::test]
async fn missing_campaign_review_redirects_quietly() {
    let app = TestApp::new();
    let admin = app.user("ada", Role::Administrator);

    let res = app.send(get("/requests/campaigns/99", Some(&cookie(&admin)))).await;
    assert_eq!(location(&res), "/requests/campaigns");
    assert!(flash(&res).is_none());
}

// -- Donations --

#[tokio::test]
async fn donation_lands_on_the_campaign_page() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let donor = app.user("donor", Role::Donor);
    let (id, _) = app.campaign(&creator, true);

    let res = app
        .send(post_form(
            "/donations",
            &format!("campaignId={}&amount=25.5", id),
            Some(&cookie(&donor)),
        ))
        .await;
    assert_eq!(location(&res), format!("/campaigns/{}", id));

    let detail = json(app.send(get(&format!("/campaigns/{}", id), None)).await).await;
    assert_eq!(detail["total_donated"], "25.50");
    assert_eq!(detail["top_donors"][0]["username"], "donor");
}

#[tokio::test]
async fn bad_donations_are_400_and_write_nothing() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let donor = app.user("donor", Role::Donor);
    let (id, _) = app.campaign(&creator, true);
    let session = cookie(&donor);

    for body in [
        format!("campaignId={}&amount=0", id),
        format!("campaignId={}&amount=-10", id),
        format!("campaignId={}&amount=lots", id),
        format!("campaignId={}&amount=1000000000000000000000000000", id),
        "campaignId=abc&amount=10".to_string(),
        format!("campaignId={}", id),
    ] {
        let res = app.send(post_form("/donations", &body, Some(&session))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", body);
        assert!(json(res).await["error"].is_string());
    }
    assert_eq!(app.db.total_donated_cents(id).unwrap(), 0);
}

#[tokio::test]
async fn donations_need_a_donor_and_an_approved_campaign() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let donor = app.user("donor", Role::Donor);
    let (pending, _) = app.campaign(&creator, false);

    let res = app
        .send(post_form("/donations", &format!("campaignId={}&amount=5", pending), None))
        .await;
    assert_eq!(location(&res), "/login");
    assert_eq!(
        flash(&res).as_deref(),
        Some("Login as a donor to access this feature.")
    );

    let res = app
        .send(post_form(
            "/donations",
            &format!("campaignId={}&amount=5", pending),
            Some(&cookie(&donor)),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// -- Updates --

#[tokio::test]
async fn updates_append_to_the_feed() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let (id, _) = app.campaign(&creator, true);
    let campaign = id.to_string();

    let res = app
        .send(post_multipart(
            "/campaigns/updates",
            &[("campaignId", campaign.as_str()), ("content", "Halfway there")],
            &[],
            None,
        ))
        .await;
    assert_eq!(location(&res), "/campaigns");

    let res = app
        .send(post_multipart(
            "/campaigns/updates",
            &[("campaignId", campaign.as_str()), ("content", "bad media")],
            &[("media", "a.gif", "image/gif", b"GIF89a")],
            None,
        ))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .send(post_multipart("/campaigns/updates", &[("campaignId", campaign.as_str())], &[], None))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let detail = json(app.send(get(&format!("/campaigns/{}", id), None)).await).await;
    let updates = detail["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["content"], "Halfway there");
}

// -- Creator requests --

#[tokio::test]
async fn creator_request_detail_only_while_pending() {
    let app = TestApp::new();
    let admin = app.user("ada", Role::Administrator);
    let session = cookie(&admin);
    let (_, request) = app.db.register_campaign_creator("cal", "plain:pw", b"%PDF-1.7").unwrap();
    let uri = format!("/campaign_creators/{}", request);

    let res = app.send(get(&uri, Some(&session))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(res).await["campaign_creator"]["username"], "cal");

    let res = app.send(get(&format!("{}/document", uri), Some(&session))).await;
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");
    let pdf = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&pdf[..], b"%PDF-1.7");

    let res = app
        .send(post_form(
            &format!("/campaign_creators/update_status/{}", request),
            "status=Approved",
            Some(&session),
        ))
        .await;
    assert_eq!(location(&res), "/campaign_creators");

    let res = app.send(get(&uri, Some(&session))).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/campaign_creators");
}

#[tokio::test]
async fn creator_request_status_and_delete() {
    let app = TestApp::new();
    let admin = app.user("ada", Role::RootAdministrator);
    let donor = app.user("donor", Role::Donor);
    let (_, request) = app.db.register_campaign_creator("cal", "plain:pw", b"%PDF").unwrap();

    let res = app
        .send(post_form(
            &format!("/campaign_creators/update_status/{}", request),
            "status=Pending",
            Some(&cookie(&admin)),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .send(send_empty(
            "DELETE",
            &format!("/campaign_creators/{}", request),
            Some(&cookie(&donor)),
        ))
        .await;
    assert_eq!(location(&res), "/login");

    let res = app
        .send(send_empty(
            "DELETE",
            &format!("/campaign_creators/{}", request),
            Some(&cookie(&admin)),
        ))
        .await;
    assert_eq!(location(&res), "/campaign_creators");
    let list = json(app.send(get("/campaign_creators", Some(&cookie(&admin)))).await).await;
    assert!(list.as_array().unwrap().is_empty());
}

// -- Reports --

#[tokio::test]
async fn reports_are_filed_reviewed_and_deleted() {
    let app = TestApp::new();
    let creator = app.user("maker", Role::CampaignCreator);
    let reporter = app.user("rita", Role::Donor);
    let admin = app.user("ada", Role::Administrator);
    let session = cookie(&admin);
    let (id, _) = app.campaign(&creator, true);

    let res = app
        .send(post_form(
            "/reports",
            &format!("description=fraud&campaignId={}&reporterId={}", id, reporter.id),
            None,
        ))
        .await;
    assert_eq!(location(&res), "/campaigns");

    let list = json(app.send(get("/reports", Some(&session))).await).await;
    let report_id = list[0]["id"].as_i64().unwrap();
    assert_eq!(list[0]["reporter"]["username"], "rita");

    let detail = json(app.send(get(&format!("/reports/{}", report_id), Some(&session))).await).await;
    assert_eq!(detail["campaign"]["creator"]["username"], "maker");

    let res = app
        .send(post_form(&format!("/reports/delete/{}", report_id), "", Some(&session)))
        .await;
    assert_eq!(location(&res), "/reports");

    let res = app.send(get(&format!("/reports/{}", report_id), Some(&session))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app
        .send(send_empty("DELETE", &format!("/reports/{}", report_id), Some(&session)))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_review_is_admin_only() {
    let app = TestApp::new();
    let donor = app.user("donor", Role::Donor);

    for uri in ["/reports", "/reports/1", "/campaign_creators", "/requests/campaigns"] {
        let res = app.send(get(uri, Some(&cookie(&donor)))).await;
        assert_eq!(res.status(), StatusCode::FOUND, "{}", uri);
        assert_eq!(location(&res), "/login");
    }
}
