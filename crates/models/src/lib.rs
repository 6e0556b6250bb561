pub mod errors;
pub mod db;
pub mod blood_type;
pub mod user;
pub mod donor;
pub mod medical_entity;
pub mod clinical_history;
pub mod donation;
pub mod blood_request;
pub mod blood_inventory;
pub mod notification;
pub mod notification_preference;

#[cfg(test)]
mod db_tests {
    use migration::MigratorTrait;
    use uuid::Uuid;

    use crate::{blood_inventory, blood_request, db, donor, medical_entity, user};

    // Exercises the schema end to end against a live database.
    // Skips (with a notice) when no database is reachable.
    #[tokio::test]
    async fn test_donor_entity_crud_against_db() {
        let db = match db::connect().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return;
            }
        };
        if let Err(e) = migration::Migrator::up(&db, None).await {
            eprintln!("skip: migrate up failed: {}", e);
            return;
        }

        let email = format!("donor_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, &email, "hash", user::ROLE_DONOR).await.expect("create user");
        let doc = format!("CC{}", &Uuid::new_v4().simple().to_string()[..10]);
        let d = donor::create(&db, &doc, "Test Donor", &email, Some(u.id)).await.expect("create donor");
        assert!(d.blood_type.is_none());

        // Unique indexes surface as Conflict, not a generic Db error
        let dup = user::create(&db, &email, "hash", user::ROLE_DONOR).await;
        assert!(matches!(dup, Err(crate::errors::ModelError::Conflict(_))), "{dup:?}");
        let dup = donor::create(&db, &doc, "Test Donor", &email, Some(u.id)).await;
        assert!(matches!(dup, Err(crate::errors::ModelError::Conflict(_))), "{dup:?}");

        donor::set_blood_type(&db, &doc, "O+").await.expect("set blood type");
        let d = donor::find_by_document(&db, &doc).await.expect("find").expect("exists");
        assert_eq!(d.blood_type.as_deref(), Some("O+"));

        let ue = user::create(&db, &format!("bank_{}@example.com", Uuid::new_v4()), "hash", user::ROLE_ENTITY)
            .await
            .expect("create entity user");
        let e = medical_entity::create(&db, "Central Bank", &ue.email, None, None, None, Some(ue.id))
            .await
            .expect("create entity");

        let req = blood_request::create(
            &db,
            blood_request::NewBloodRequest {
                entity_id: e.id,
                blood_type: "O+".into(),
                amount_ml: 450,
                urgency: "High".into(),
                required_date: chrono::Utc::now().date_naive(),
                observations: None,
                emergency: false,
                location: None,
            },
        )
        .await
        .expect("create request");
        assert_eq!(req.blood_type, "O+");

        let inv = blood_inventory::add_donation(&db, e.id, "O+", 450, Some("Central Bank".into()))
            .await
            .expect("inventory upsert");
        assert_eq!(inv.units, 1);
        let inv = blood_inventory::add_donation(&db, e.id, "O+", 450, None)
            .await
            .expect("inventory upsert again");
        assert_eq!(inv.units, 2);
        assert_eq!(inv.amount_ml, 900);

        // cleanup: cascades from users
        user::hard_delete(&db, u.id).await.expect("delete donor user");
        user::hard_delete(&db, ue.id).await.expect("delete entity user");
    }
}
