use super::*;

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse(" text "), LogFormat::Text);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::parse("xml"), LogFormat::Text);
}

#[test]
fn test_init_without_filter_installs_nothing() {
    if std::env::var_os(FILTER_VAR).is_none() && std::env::var_os(EnvFilter::DEFAULT_ENV).is_none()
    {
        assert!(configured_filter().is_none());
        assert!(!init_tracing());
    }
}
