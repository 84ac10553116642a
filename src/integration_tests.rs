//! End-to-end tests: dictionary files on disk or over HTTP, through
//! preprocessing, to rendered strings.

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const EN: &str = r##"{
        "@metadata": {"authors": ["someone"]},
        "greeting": ["Hello,", "#$name", "$!"],
        "spaced": ["Hello, ", "#name", "!"],
        "price": ["Total:", "~$", "#$amount"],
        "hashtag": ["~#rust", "$is", "#$mood"],
        "broken": ["Oops", "#$"]
    }"##;

    const RU: &str = r##"{
        "greeting": ["Привет,", "#$name", "$!"]
    }"##;

    fn locales_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), EN).unwrap();
        fs::write(dir.path().join("ru.json"), RU).unwrap();
        fs::write(dir.path().join("de.json"), "not json at all").unwrap();
        dir
    }

    fn subs(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    // ============================================================================
    // Rendering fixtures
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_rendering_fixtures() {
        let dir = locales_dir();
        let config = LocalizeConfig::default().with_dictionary_dir(dir.path());
        let localizer = Localizer::init(&config, None, &FileSource::new(dir.path())).await;

        assert_eq!(localizer.active_locale(), Some("en"));
        assert_eq!(
            localizer.get("greeting", &subs(&[("name", "World")])),
            "Hello, World!"
        );
        // "Hello, " already ends in a space and every spaced element gets one
        // more, the trailing "!" included.
        assert_eq!(
            localizer.get("spaced", &subs(&[("name", "World")])),
            "Hello,  World ! "
        );
        assert_eq!(
            localizer.get("price", &subs(&[("amount", "42")])),
            "Total: $ 42"
        );
        assert_eq!(
            localizer.get("hashtag", &subs(&[("mood", "great")])),
            "#rust isgreat"
        );
        assert_eq!(localizer.get("broken", &subs(&[])), "Oops ");
        assert_eq!(localizer.warnings().len(), 1);
        assert_eq!(localizer.warnings()[0].message_key, "broken");
        assert_eq!(localizer.warnings()[0].index, 1);
    }

    // ============================================================================
    // Client fallback: fr is requested, only en exists
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_fallback_to_default_locale() {
        let dir = locales_dir();
        let config = LocalizeConfig::default()
            .with_dictionary_dir(dir.path())
            .with_default_locale("en");
        let source = FileSource::new(dir.path());

        let localizer = Localizer::init(&config, Some("fr-FR"), &source).await;
        assert_eq!(localizer.active_locale(), Some("en"));
        assert!(matches!(
            &localizer.history()[1],
            LoadState::Failed { locale, error: LoadError::NotFound(_) } if locale == "fr"
        ));

        // Invalid JSON counts as a failed load as well
        let localizer = Localizer::init(&config, Some("de"), &source).await;
        assert_eq!(localizer.active_locale(), Some("en"));

        let empty = TempDir::new().unwrap();
        let localizer = Localizer::init(&config, Some("fr"), &FileSource::new(empty.path())).await;
        assert!(!localizer.is_ready());
        assert_eq!(localizer.history().last(), Some(&LoadState::FailedFinal));
    }

    // ============================================================================
    // Registry over files: one locale missing, one invalid
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_registry_from_config() {
        let dir = locales_dir();
        let config = LocalizeConfig::default()
            .with_dictionary_dir(dir.path())
            .with_locales(&["en", "ru", "fr", "de"]);

        let registry = LocaleRegistry::from_config(&config).await;
        assert_eq!(registry.locales().count(), 4);
        assert_eq!(registry.ready_locales().collect::<Vec<_>>(), vec!["en", "ru"]);
        assert_eq!(
            registry.get("greeting", &subs(&[("name", "Мир")]), "ru"),
            "Привет, Мир!"
        );
        assert_eq!(registry.get("greeting", &subs(&[("name", "x")]), "de"), "");
    }

    // ============================================================================
    // Registry over HTTP
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_registry_over_http() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/locales/en.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EN))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/locales/ru.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = HttpSource::new(&format!("{}/locales", mock_server.uri())).unwrap();
        let registry = LocaleRegistry::load(&["en", "ru"], &source).await;

        assert!(registry.is_ready("en"));
        assert!(!registry.is_ready("ru"));
        assert!(matches!(
            registry.outcomes()[1].error,
            Some(LoadError::HttpStatus(500, _))
        ));
        assert_eq!(
            registry.get("greeting", &subs(&[("name", "HTTP")]), "en"),
            "Hello, HTTP!"
        );
    }

    // ============================================================================
    // Concurrent renders of the same message do not interfere
    // ============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_concurrent_renders() {
        let source = MemorySource::new().with_dictionary("en", EN);
        let registry = Arc::new(LocaleRegistry::load(&["en"], &source).await);

        let mut handles = Vec::new();
        for i in 0..32 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let name = format!("user{}", i);
                let mut substitutions = HashMap::new();
                substitutions.insert("name".to_string(), name.clone());
                let rendered = registry.get("greeting", &substitutions, "en");
                (name, rendered)
            }));
        }

        for handle in handles {
            let (name, rendered) = handle.await.unwrap();
            assert_eq!(rendered, format!("Hello, {}!", name));
        }
    }
}
