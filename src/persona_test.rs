use super::*;

#[test]
fn builtin_greeting_mentions_both_topics() {
    let persona = Persona::builtin();
    assert!(persona.greeting.starts_with("Welcome!"));
    assert!(persona.greeting.contains("**Fleet Orchestration**"));
    assert!(persona.greeting.contains("**Six Pillars**"));
}

#[test]
fn system_prompt_substitutes_article_url() {
    let prompt = Persona::builtin().system_prompt();
    assert!(!prompt.contains("{article_url}"));
    assert!(prompt.contains(ARTICLE_URL));
    assert!(prompt.contains("Data Platform Guide"));
}

#[test]
fn system_prompt_includes_summary_pillars() {
    let prompt = Persona::builtin().system_prompt();
    for pillar in [
        "Standardized Telemetry",
        "Edge Intelligence",
        "Secure Transport",
        "Fleet Orchestration",
        "Unified Data Lakes",
        "Consumer APIs",
    ] {
        assert!(prompt.contains(pillar), "missing pillar {pillar}");
    }
    assert!(prompt.contains("under 150 words"));
}

#[test]
fn yaml_override_keeps_unset_fields() {
    let persona = Persona::from_yaml_str(
        "article_url: https://blog.example/post\ngreeting: Hi there\n",
    )
    .unwrap();
    assert_eq!(persona.greeting, "Hi there");
    assert_eq!(persona.article_url, "https://blog.example/post");
    assert_eq!(persona.failure_text, FAILURE_TEXT);
    assert!(persona.system_prompt().contains("https://blog.example/post"));
}

#[test]
fn yaml_empty_document_is_builtin() {
    assert_eq!(Persona::from_yaml_str("").unwrap(), Persona::builtin());
}

#[test]
fn yaml_unknown_field_is_rejected() {
    assert!(Persona::from_yaml_str("temperature: 0.9\n").is_err());
}

#[test]
fn missing_file_is_read_error() {
    let err = Persona::from_yaml_file(Path::new("/nonexistent/persona.yaml")).unwrap_err();
    assert!(matches!(err, PersonaError::Read { .. }));
    assert_eq!(crate::error_code::ErrorCode::error_code(&err), "E_PERSONA_READ");
}

#[test]
fn file_round_trip_through_disk() {
    let path = std::env::temp_dir().join(format!("persona-{}.yaml", uuid::Uuid::new_v4()));
    std::fs::write(&path, "agent_name: Test Guide\n").unwrap();
    let persona = Persona::from_yaml_file(&path).unwrap();
    assert_eq!(persona.agent_name, "Test Guide");
    std::fs::remove_file(&path).unwrap();
}
