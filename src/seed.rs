use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{CheckIn, User, Validation};
use crate::store::MemoryStore;

struct DemoUser {
    name: &'static str,
    email: &'static str,
    level: u8,
    points: i64,
    consecutive_weeks: i64,
    medals: &'static [&'static str],
    last_visit_days_ago: i64,
}

const DEMO_PASSWORD: &str = "senha123";

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "João Silva",
        email: "joao@example.com",
        level: 1,
        points: 50,
        consecutive_weeks: 3,
        medals: &[],
        last_visit_days_ago: 2,
    },
    DemoUser {
        name: "Maria Oliveira",
        email: "maria@example.com",
        level: 2,
        points: 120,
        consecutive_weeks: 8,
        medals: &["PRIMEIRO PASSO"],
        last_visit_days_ago: 1,
    },
    DemoUser {
        name: "Pedro Santos",
        email: "pedro@example.com",
        level: 3,
        points: 200,
        consecutive_weeks: 12,
        medals: &["PRIMEIRO PASSO", "SEGUNDO PASSO"],
        last_visit_days_ago: 0,
    },
    DemoUser {
        name: "Ana Costa",
        email: "ana@example.com",
        level: 1,
        points: 30,
        consecutive_weeks: 2,
        medals: &[],
        last_visit_days_ago: 10,
    },
    DemoUser {
        name: "Carlos Ferreira",
        email: "carlos@example.com",
        level: 2,
        points: 0,
        consecutive_weeks: 0,
        medals: &[],
        last_visit_days_ago: 60,
    },
];

/// Loads the demo accounts plus a randomized two-month attendance history,
/// so the API has data to play with out of the box. Idempotent: a store that
/// already has users is left alone.
pub fn seed_demo_data(store: &MemoryStore) {
    if store.user_count() > 0 {
        tracing::debug!("store already populated, skipping demo seed");
        return;
    }

    let now = Utc::now();
    let mut rng = rand::rng();

    for demo in DEMO_USERS {
        let password_hash = match bcrypt::hash(DEMO_PASSWORD, 4) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::warn!(error = %err, email = demo.email, "demo password hash failed");
                continue;
            }
        };

        let user_id = Uuid::new_v4().to_string();
        let user = User {
            id: user_id.clone(),
            name: demo.name.to_string(),
            email: demo.email.to_string(),
            password_hash,
            level: demo.level,
            points: demo.points,
            consecutive_weeks: demo.consecutive_weeks,
            medals: demo.medals.iter().map(|m| m.to_string()).collect(),
            last_visit: Some(now - Duration::days(demo.last_visit_days_ago)),
        };

        if let Err(err) = store.insert_user(user) {
            tracing::warn!(error = %err, email = demo.email, "demo user insert failed");
            continue;
        }

        let sessions = rng.random_range(10..=30);
        for _ in 0..sessions {
            // Anywhere in the trailing two months.
            let check_in_time = now - Duration::minutes(rng.random_range(0..=60 * 24 * 60));
            let duration_minutes = rng.random_range(30..=120);

            let check_in = CheckIn {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.clone(),
                check_in_time,
                check_out_time: Some(check_in_time + Duration::minutes(duration_minutes)),
                duration_minutes,
            };

            store.insert_validation(Validation {
                id: Uuid::new_v4().to_string(),
                check_in_id: check_in.id.clone(),
                user_id: user_id.clone(),
                trainer_validated: rng.random_bool(0.8),
                date: check_in_time,
            });
            store.insert_check_in(check_in);
        }

        tracing::info!(email = demo.email, sessions, "seeded demo user");
    }
}
