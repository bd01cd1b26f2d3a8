use async_trait::async_trait;
use gemini_rag_mcp::client::FileSearchApi;
use gemini_rag_mcp::dispatch::Dispatcher;
use gemini_rag_mcp::error::{ErrorKind, GeminiError, Result};
use gemini_rag_mcp::models::{ImportFileRequest, RagQuery, UploadRequest};
use gemini_rag_mcp::multipart::ContentEncoding;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

/// Records each call as `method(args...)` and answers with canned values.
#[derive(Default)]
struct RecordingApi {
    calls: Mutex<Vec<String>>,
    uploads: Mutex<Vec<UploadRequest>>,
    queries: Mutex<Vec<RagQuery>>,
    fail_with: Mutex<Option<(u16, String)>>,
    reply_with: Mutex<Option<Value>>,
}

impl RecordingApi {
    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().take() {
            Some((status, body)) => Err(GeminiError::Api { status, body }),
            None => Ok(()),
        }
    }

    /// The queued reply, or `default` when none is set.
    fn reply(&self, default: Value) -> Result<Value> {
        Ok(self.reply_with.lock().unwrap().take().unwrap_or(default))
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn operation(name: &str) -> Value {
    json!({ "name": name })
}

#[async_trait]
impl FileSearchApi for RecordingApi {
    async fn create_store(&self, display_name: &str) -> Result<Value> {
        self.record(format!("create_store({})", display_name))?;
        self.reply(json!({ "name": "fileSearchStores/new", "displayName": display_name }))
    }

    async fn list_stores(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<Value> {
        self.record(format!("list_stores({:?}, {:?})", page_size, page_token))?;
        self.reply(json!({}))
    }

    async fn get_store(&self, store_name: &str) -> Result<Value> {
        self.record(format!("get_store({})", store_name))?;
        self.reply(json!({ "name": store_name }))
    }

    async fn delete_store(&self, store_name: &str, force: bool) -> Result<Value> {
        self.record(format!("delete_store({}, {})", store_name, force))?;
        self.reply(json!({}))
    }

    async fn upload_to_store(&self, store_name: &str, upload: &UploadRequest) -> Result<Value> {
        self.record(format!("upload_to_store({})", store_name))?;
        self.uploads.lock().unwrap().push(upload.clone());
        self.reply(operation("fileSearchStores/s/upload/operations/u"))
    }

    async fn import_file_to_store(
        &self,
        store_name: &str,
        import: &ImportFileRequest,
    ) -> Result<Value> {
        self.record(format!(
            "import_file_to_store({}, {})",
            store_name, import.file_name
        ))?;
        self.reply(operation("fileSearchStores/s/operations/i"))
    }

    async fn get_operation(&self, operation_name: &str) -> Result<Value> {
        self.record(format!("get_operation({})", operation_name))?;
        self.reply(operation(operation_name))
    }

    async fn get_upload_operation(&self, operation_name: &str) -> Result<Value> {
        self.record(format!("get_upload_operation({})", operation_name))?;
        self.reply(operation(operation_name))
    }

    async fn list_documents(
        &self,
        store_name: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<Value> {
        self.record(format!(
            "list_documents({}, {:?}, {:?})",
            store_name, page_size, page_token
        ))?;
        self.reply(json!({}))
    }

    async fn get_document(&self, document_name: &str) -> Result<Value> {
        self.record(format!("get_document({})", document_name))?;
        self.reply(json!({ "name": document_name }))
    }

    async fn delete_document(&self, document_name: &str, force: bool) -> Result<Value> {
        self.record(format!("delete_document({}, {})", document_name, force))?;
        self.reply(json!({}))
    }

    async fn rag_query(&self, query: &RagQuery) -> Result<Value> {
        self.record(format!("rag_query({})", query.query))?;
        self.queries.lock().unwrap().push(query.clone());
        self.reply(json!({ "candidates": [] }))
    }
}

fn setup() -> (Arc<RecordingApi>, Dispatcher) {
    let api = Arc::new(RecordingApi::default());
    let dispatcher = Dispatcher::with_backend(api.clone());
    (api, dispatcher)
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

#[tokio::test]
async fn test_every_tool_routes_to_one_call() {
    let (api, dispatcher) = setup();
    let cases = [
        ("gemini_create_store", json!({"display_name": "docs"}), "create_store(docs)"),
        ("gemini_list_stores", json!({"page_size": 3}), "list_stores(Some(3), None)"),
        ("gemini_get_store", json!({"store_name": "fileSearchStores/a"}), "get_store(fileSearchStores/a)"),
        ("gemini_delete_store", json!({"store_name": "fileSearchStores/a"}), "delete_store(fileSearchStores/a, false)"),
        (
            "gemini_upload_to_store",
            json!({"store_name": "fileSearchStores/a", "content": "hi", "mime_type": "text/plain"}),
            "upload_to_store(fileSearchStores/a)",
        ),
        (
            "gemini_import_file_to_store",
            json!({"store_name": "fileSearchStores/a", "file_name": "files/f"}),
            "import_file_to_store(fileSearchStores/a, files/f)",
        ),
        ("gemini_get_operation", json!({"operation_name": "ops/1"}), "get_operation(ops/1)"),
        ("gemini_get_upload_operation", json!({"operation_name": "ops/2"}), "get_upload_operation(ops/2)"),
        (
            "gemini_list_documents",
            json!({"store_name": "fileSearchStores/a", "page_token": "t"}),
            "list_documents(fileSearchStores/a, None, Some(\"t\"))",
        ),
        ("gemini_get_document", json!({"document_name": "fileSearchStores/a/documents/d"}), "get_document(fileSearchStores/a/documents/d)"),
        (
            "gemini_delete_document",
            json!({"document_name": "fileSearchStores/a/documents/d", "force": true}),
            "delete_document(fileSearchStores/a/documents/d, true)",
        ),
        (
            "gemini_rag_query",
            json!({"query": "why?", "store_names": ["fileSearchStores/a"]}),
            "rag_query(why?)",
        ),
    ];
    assert_eq!(cases.len(), dispatcher.list_tools().len());

    for (tool, input, expected) in &cases {
        dispatcher.dispatch(tool, &args(input.clone())).await.unwrap();
        assert_eq!(api.calls().last().map(String::as_str), Some(*expected), "{}", tool);
    }
    assert_eq!(api.calls().len(), cases.len());
}

#[tokio::test]
async fn test_upload_arguments_are_remapped() {
    let (api, dispatcher) = setup();
    dispatcher
        .dispatch(
            "gemini_upload_to_store",
            &args(json!({
                "store_name": "fileSearchStores/a",
                "content": "aGk=",
                "mime_type": "text/plain",
                "display_name": "greeting",
                "content_encoding": "base64",
                "custom_metadata": [{"key": "lang", "stringValue": "en"}]
            })),
        )
        .await
        .unwrap();

    let uploads = api.uploads.lock().unwrap();
    let upload = &uploads[0];
    assert_eq!(upload.content_encoding, ContentEncoding::Base64);
    assert_eq!(upload.display_name.as_deref(), Some("greeting"));
    assert_eq!(upload.custom_metadata.as_ref().unwrap()[0].key, "lang");
}

#[tokio::test]
async fn test_rag_query_arguments_are_remapped() {
    let (api, dispatcher) = setup();
    dispatcher
        .dispatch(
            "gemini_rag_query",
            &args(json!({
                "query": "q",
                "store_names": ["fileSearchStores/a", "fileSearchStores/b"],
                "model": "gemini-2.5-pro",
                "metadata_filter": "lang = \"en\""
            })),
        )
        .await
        .unwrap();

    let queries = api.queries.lock().unwrap();
    assert_eq!(queries[0].store_names.len(), 2);
    assert_eq!(queries[0].model(), "gemini-2.5-pro");
    assert_eq!(queries[0].metadata_filter.as_deref(), Some("lang = \"en\""));
}

#[tokio::test]
async fn test_results_are_returned_as_json() {
    let (_api, dispatcher) = setup();
    let value = dispatcher
        .dispatch("gemini_create_store", &args(json!({"display_name": "docs"})))
        .await
        .unwrap();
    assert_eq!(
        value,
        json!({"name": "fileSearchStores/new", "displayName": "docs"})
    );
}

#[tokio::test]
async fn test_remote_json_is_forwarded_verbatim() {
    let (api, dispatcher) = setup();
    let responses = [
        (
            "gemini_list_stores",
            json!({}),
            json!({"fileSearchStores": [], "nextPageToken": "t", "unreachable": ["x"]}),
        ),
        (
            "gemini_get_document",
            json!({"document_name": "fileSearchStores/a/documents/d"}),
            json!({
                "name": "fileSearchStores/a/documents/d",
                "displayName": null,
                "customMetadata": [
                    {"key": "year", "numericValue": 2024},
                    {"key": "k", "stringValue": "v", "futureValue": 1}
                ]
            }),
        ),
        (
            "gemini_get_operation",
            json!({"operation_name": "ops/1"}),
            json!({"name": "ops/1", "metadata": {"@type": "x"}}),
        ),
    ];

    for (tool, input, reply) in responses {
        *api.reply_with.lock().unwrap() = Some(reply.clone());
        let value = dispatcher.dispatch(tool, &args(input)).await.unwrap();
        assert_eq!(value, reply, "{}", tool);
        assert_eq!(value.to_string(), reply.to_string(), "{}", tool);
    }
}

#[tokio::test]
async fn test_unknown_tool_makes_no_call() {
    let (api, dispatcher) = setup();
    let err = dispatcher
        .dispatch("gemini_drop_everything", &Map::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownTool);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_bad_arguments_make_no_call() {
    let (api, dispatcher) = setup();
    let err = dispatcher
        .dispatch("gemini_get_store", &args(json!({"store_name": 7})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);

    let err = dispatcher
        .dispatch("gemini_rag_query", &args(json!({"query": "q"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_remote_failure_passes_through() {
    let (api, dispatcher) = setup();
    *api.fail_with.lock().unwrap() = Some((403, "denied".to_string()));

    let err = dispatcher
        .dispatch("gemini_list_stores", &Map::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Gemini API Error (403): denied");
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_share_backend() {
    let (api, dispatcher) = setup();
    let dispatcher = Arc::new(dispatcher);

    let mut handles = Vec::new();
    for i in 0..8 {
        let dispatcher = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            let input = args(json!({"operation_name": format!("ops/{}", i)}));
            dispatcher.dispatch("gemini_get_operation", &input).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(api.calls().len(), 8);
}
