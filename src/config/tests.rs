use super::*;

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
    assert_eq!(settings.site.primary_origin(), "https://blog.labjp.xyz");
    assert_eq!(settings.edge.country_header.as_str(), "cf-ipcountry");
    assert!(!settings.rate_limit.enabled);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.database.url = Some("sqlite://from-file.db".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        database: DatabaseOverride {
            database_url: Some("sqlite://from-cli.db".to_string()),
        },
        rate_limit_enabled: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.database.url, "sqlite://from-cli.db");
    assert!(settings.rate_limit.enabled);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn origins_are_reduced_and_deduplicated() {
    let mut raw = RawSettings::default();
    raw.site.allowed_origins = Some(vec![
        "https://example.com/blog/".to_string(),
        "https://example.com".to_string(),
        "http://localhost:4321".to_string(),
    ]);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.site.allowed_origins,
        vec![
            "https://example.com".to_string(),
            "http://localhost:4321".to_string()
        ]
    );
}

#[test]
fn invalid_values_name_their_key() {
    let mut raw = RawSettings::default();
    raw.site.allowed_origins = Some(vec!["not a url".to_string()]);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "site.allowed_origins",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "database.max_connections",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.database.url = Some("postgres://localhost/blog".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "database.url",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.edge.country_header = Some("bad header".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "edge.country_header",
            ..
        })
    ));
}

#[test]
fn country_header_is_configurable() {
    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&ServeOverrides {
        country_header: Some("X-Country".to_string()),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.edge.country_header.as_str(), "x-country");
}
