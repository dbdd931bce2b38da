#[cfg(test)]
mod tests {

    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;
    use tokio::time::{timeout, Duration};
    use uuid::Uuid;

    use crate::config::Config;
    use crate::controller::{Intent, Notice, TaskController, ViewFilter};
    use crate::enrich::GeminiEnricher;
    use crate::model::Priority;
    use crate::store::SupabaseStore;

    fn config_for(supabase: &MockServer, gemini: &MockServer) -> Config {
        Config::from_str(&format!(
            r#"
        supabase:
            url: "{}"
            key: "test-anon-key"
        gemini:
            url: "{}"
            api_key: "test-gemini-key"
            model: "gemini-3-flash-preview"
        "#,
            supabase.base_url(),
            gemini.base_url(),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_e2e_load_then_add() {
        // GIVEN a database holding one row and a model that replies
        let supabase = MockServer::start();
        let gemini = MockServer::start();

        supabase.mock(|when, then| {
            when.method(GET).path("/rest/v1/todos");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!([{
                        "id": "5f64a2bb-8c24-4966-8e4c-3093476f7fc2",
                        "created_at": "2024-05-01T09:00:00+00:00",
                        "title": "Water plants",
                        "is_completed": false,
                        "priority": "medium",
                        "due_date": null,
                        "description": null
                    }])
                    .to_string(),
                );
        });
        let refine = gemini.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent")
                .header("x-goog-api-key", "test-gemini-key");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "candidates": [{
                            "content": {
                                "parts": [{ "text": "Remember the oat milk too." }]
                            }
                        }]
                    })
                    .to_string(),
                );
        });
        let create = supabase.mock(|when, then| {
            when.method(POST).path("/rest/v1/todos").json_body(json!({
                "title": "Buy milk",
                "priority": "high",
                "is_completed": false,
                "description": "Remember the oat milk too."
            }));
            then.status(201)
                .header("content-type", "application/json")
                .body(
                    json!([{
                        "id": "b7b054ca-0d37-418b-ab16-ebe8aa409285",
                        "created_at": "2024-05-02T09:00:00+00:00",
                        "title": "Buy milk",
                        "is_completed": false,
                        "priority": "high",
                        "due_date": null,
                        "description": "Remember the oat milk too."
                    }])
                    .to_string(),
                );
        });

        let config = config_for(&supabase, &gemini);
        let store = SupabaseStore::new(&config.supabase).unwrap();
        let enricher = GeminiEnricher::new(&config.gemini).unwrap();
        let mut handle = TaskController::start(store, enricher);

        // WHEN the first load lands
        handle.intents.send(Intent::Load).await.unwrap();
        timeout(
            Duration::from_secs(2),
            handle.view.wait_for(|view| !view.loading),
        )
        .await
        .unwrap()
        .unwrap();

        // THEN the stored row is visible, id decoded and all
        {
            let view = handle.view.borrow();
            assert_eq!(view.stats.total, 1);
            assert_eq!(view.tasks[0].title, "Water plants");
            assert_eq!(
                view.tasks[0].id,
                Uuid::parse_str("5f64a2bb-8c24-4966-8e4c-3093476f7fc2").unwrap()
            );
        }

        // WHEN a task is added
        handle
            .intents
            .send(Intent::Add {
                title: "Buy milk".to_string(),
                priority: Priority::High,
            })
            .await
            .unwrap();
        let notice = timeout(Duration::from_secs(2), handle.notices.recv())
            .await
            .unwrap();

        // THEN the refined row lands on top of the active bucket
        assert_eq!(notice, Some(Notice::Added));
        refine.assert();
        create.assert();
        let view = handle.view.borrow();
        assert_eq!(view.filter, ViewFilter::Active);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.tasks[0].title, "Buy milk");
        assert_eq!(
            view.tasks[0].description.as_deref(),
            Some("Remember the oat milk too.")
        );
    }

    #[tokio::test]
    async fn test_e2e_add_survives_a_model_outage() {
        // GIVEN an empty database and a model that is down
        let supabase = MockServer::start();
        let gemini = MockServer::start();

        supabase.mock(|when, then| {
            when.method(GET).path("/rest/v1/todos");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });
        gemini.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent");
            then.status(500)
                .header("content-type", "application/json")
                .body(r#"{"error":{"message":"Internal error"}}"#);
        });
        let create = supabase.mock(|when, then| {
            when.method(POST).path("/rest/v1/todos").json_body(json!({
                "title": "Buy milk",
                "priority": "medium",
                "is_completed": false,
                "description": null
            }));
            then.status(201)
                .header("content-type", "application/json")
                .body(
                    json!([{
                        "id": "b7b054ca-0d37-418b-ab16-ebe8aa409285",
                        "created_at": "2024-05-02T09:00:00+00:00",
                        "title": "Buy milk",
                        "is_completed": false,
                        "priority": "medium",
                        "due_date": null,
                        "description": null
                    }])
                    .to_string(),
                );
        });

        let config = config_for(&supabase, &gemini);
        let store = SupabaseStore::new(&config.supabase).unwrap();
        let enricher = GeminiEnricher::new(&config.gemini).unwrap();
        let mut handle = TaskController::start(store, enricher);

        handle.intents.send(Intent::Load).await.unwrap();
        timeout(
            Duration::from_secs(2),
            handle.view.wait_for(|view| !view.loading),
        )
        .await
        .unwrap()
        .unwrap();

        // WHEN the model fails during an add
        handle
            .intents
            .send(Intent::Add {
                title: "Buy milk".to_string(),
                priority: Priority::Medium,
            })
            .await
            .unwrap();
        let notice = timeout(Duration::from_secs(2), handle.notices.recv())
            .await
            .unwrap();

        // THEN the task is still created, just without a description
        assert_eq!(notice, Some(Notice::Added));
        create.assert();
        let view = handle.view.borrow();
        assert_eq!(view.tasks[0].description, None);
    }
}
