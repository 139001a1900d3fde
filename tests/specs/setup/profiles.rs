//! Profile selection specs
//!
//! Verify the profile chosen before a run is the one INIT connects with.

use crate::prelude::*;
use cb_engine::{select_profile, ProfileChoice};
use similar_asserts::assert_eq;

fn mysql() -> Driver {
    Driver::new("mysql", "MySQL")
        .with_field(DriverField::required(SettingField::Host, "Host"))
        .with_field(DriverField::required(SettingField::Port, "Port").with_default("3306"))
        .with_field(DriverField::optional(SettingField::Username, "User"))
        .with_field(DriverField::optional(SettingField::Password, "Password"))
}

#[tokio::test]
async fn new_profile_is_used_by_init() {
    let scenario = Scenario {
        profiles: MemoryProfileStore::new(vec![sqlite(), mysql()]),
        ..Scenario::new(&["base"])
    };

    let profile = select_profile(
        &scenario.profiles,
        ProfileChoice::New {
            name: "shop".to_string(),
            driver: "mysql".to_string(),
            settings: ConnectionSettings {
                host: Some("db.shop.local".to_string()),
                username: Some("admin".to_string()),
                ..Default::default()
            },
        },
    )
    .unwrap();
    assert_eq!(profile.settings.port, Some(3306));

    let controller = scenario.controller();
    run(&controller, &[Decision::Reject]).await;

    assert_eq!(
        scenario.database.calls()[0],
        DatabaseCall::Connect {
            profile: "shop".to_string()
        }
    );
}

#[tokio::test]
async fn switching_profiles_between_runs() {
    let scenario = Scenario::new(&[]);
    scenario.profiles.save(Profile::new("backup", "sqlite")).unwrap();

    select_profile(
        &scenario.profiles,
        ProfileChoice::Select {
            name: "backup".to_string(),
        },
    )
    .unwrap();

    // Each run is a fresh controller
    let controller = scenario.controller();
    run(&controller, &[Decision::Reject]).await;

    assert_eq!(
        scenario.database.calls()[0],
        DatabaseCall::Connect {
            profile: "backup".to_string()
        }
    );
}

#[test]
fn drivers_are_listed_by_display_name() {
    let store = MemoryProfileStore::new(vec![sqlite(), mysql()]);
    let names: Vec<String> = store.drivers().into_iter().map(|d| d.display).collect();
    assert_eq!(names, strings(&["MySQL", "SQLite"]));
}
