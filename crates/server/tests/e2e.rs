use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, auth};

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Prefer env over a config file that may point elsewhere
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    if std::env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into(), token_ttl_days: 7 },
    };

    let app: Router = routes::build_router(state, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn register(
    c: &reqwest::Client,
    base: &str,
    role: &str,
    name: &str,
    document: Option<&str>,
) -> anyhow::Result<(String, String)> {
    let email = format!("{role}_{}@example.com", Uuid::new_v4());
    let mut body = json!({
        "email": email,
        "password": "S3curePass!",
        "role": role,
        "name": name,
    });
    if let Some(doc) = document {
        body["document"] = json!(doc);
    }
    let res = c.post(format!("{base}/api/auth/register")).json(&body).send().await?;
    anyhow::ensure!(res.status() == HttpStatusCode::CREATED, "register failed: {}", res.status());
    let v = res.json::<Value>().await?;
    let token = v["token"].as_str().unwrap().to_string();
    Ok((email, token))
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = client().get(format!("{}/api/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

/// The whole donation lifecycle: donor registers and types their blood,
/// entity records a donation, stock grows, an emergency request fans out to
/// the donor, who reads the notification.
#[tokio::test]
async fn e2e_donation_and_emergency_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let base = &app.base_url;
    let c = client();

    let document = format!("CC{}", &Uuid::new_v4().simple().to_string()[..10]);
    let (_, donor_token) = register(&c, base, "donor", "Dana Donor", Some(&document)).await?;
    let (_, entity_token) = register(&c, base, "entity", "Central Clinic", None).await?;

    // Donor declares a blood type
    let res = c
        .patch(format!("{base}/api/donors/{document}/blood-type"))
        .bearer_auth(&donor_token)
        .json(&json!({"blood_type": "O+"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // Donor submits the questionnaire, entity approves it
    let res = c
        .post(format!("{base}/api/clinical-histories"))
        .bearer_auth(&donor_token)
        .json(&json!({"age": 30, "weight_kg": 72.5, "prior_transfusions": false}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let history = res.json::<Value>().await?;
    assert_eq!(history["status"], "Pending");

    let history_id = history["id"].as_str().unwrap();
    let res = c
        .patch(format!("{base}/api/clinical-histories/{history_id}"))
        .bearer_auth(&entity_token)
        .json(&json!({"status": "Approved", "medical_notes": "fit to donate"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "Approved");

    // Entity records a donation; typed donor means stock moves
    let res = c
        .post(format!("{base}/api/donations"))
        .bearer_auth(&entity_token)
        .json(&json!({
            "donor_document": document,
            "donation_date": "2026-08-01",
            "amount_ml": 450,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let recorded = res.json::<Value>().await?;
    assert_eq!(recorded["inventory_updated"], true);

    let res = c
        .get(format!("{base}/api/inventory"))
        .bearer_auth(&entity_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let stock = res.json::<Value>().await?;
    let row = stock
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["blood_type"] == "O+")
        .expect("O+ stock row");
    assert!(row["amount_ml"].as_i64().unwrap() >= 450);

    // Emergency request fans out to the matching donor
    let res = c
        .post(format!("{base}/api/requests/emergency"))
        .bearer_auth(&entity_token)
        .json(&json!({
            "blood_type": "O+",
            "amount_ml": 900,
            "required_date": "2026-09-01",
            "location": "Ward 3",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["urgency"], "Critical");
    assert_eq!(created["emergency"], true);
    assert!(created["donors_notified"].as_u64().unwrap() >= 1);

    // Donor sees the notification and marks it read
    let res = c
        .get(format!("{base}/api/notifications"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let feed = res.json::<Value>().await?;
    let first = &feed.as_array().unwrap()[0];
    assert_eq!(first["kind"], "emergency");
    assert_eq!(first["read"], false);

    let notification_id = first["id"].as_str().unwrap();
    let res = c
        .patch(format!("{base}/api/notifications/{notification_id}/read"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["read"], true);

    // Donor request feed carries the emergency
    let res = c
        .get(format!("{base}/api/requests"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(!res.json::<Value>().await?.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_role_and_preference_rules() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let base = &app.base_url;
    let c = client();

    let document = format!("CC{}", &Uuid::new_v4().simple().to_string()[..10]);
    let (_, donor_token) = register(&c, base, "donor", "Pat Donor", Some(&document)).await?;
    let (_, entity_token) = register(&c, base, "entity", "North Clinic", None).await?;

    // Donors cannot touch entity-only surfaces
    let res = c
        .get(format!("{base}/api/inventory"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    let res = c
        .get(format!("{base}/api/reports/donations"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    // Unstored preference reads as the defaults
    let res = c
        .get(format!("{base}/api/notification-preferences"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let pref = res.json::<Value>().await?;
    assert_eq!(pref["receive_notifications"], true);
    assert_eq!(pref["emergencies_only"], false);

    // Opt out, then a routine High request must not reach the donor
    let res = c
        .patch(format!("{base}/api/donors/{document}/blood-type"))
        .bearer_auth(&donor_token)
        .json(&json!({"blood_type": "AB-"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .put(format!("{base}/api/notification-preferences"))
        .bearer_auth(&donor_token)
        .json(&json!({"receive_notifications": false, "emergencies_only": false}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .post(format!("{base}/api/requests"))
        .bearer_auth(&entity_token)
        .json(&json!({
            "blood_type": "AB-",
            "amount_ml": 450,
            "urgency": "High",
            "required_date": "2026-09-15",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c
        .get(format!("{base}/api/notifications"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.json::<Value>().await?.as_array().unwrap().is_empty());

    // Entity report works and returns rows plus stats
    let res = c
        .get(format!("{base}/api/reports/donations?from=2026-01-01&to=2026-12-31"))
        .bearer_auth(&entity_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let report = res.json::<Value>().await?;
    assert!(report["stats"]["total_donations"].as_u64().is_some());
    assert!(report["donations"].is_array());

    // Availability search is entity-only
    let res = c
        .get(format!("{base}/api/blood-search?blood_type=O%2B&min_amount_ml=1"))
        .bearer_auth(&donor_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    let res = c
        .get(format!("{base}/api/blood-search?blood_type=O%2B&min_amount_ml=1"))
        .bearer_auth(&entity_token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let found = res.json::<Value>().await?;
    assert_eq!(found["total"].as_u64().unwrap() as usize, found["results"].as_array().unwrap().len());
    Ok(())
}
