//! Static prompt templates advertised over MCP.
//!
//! Two guides walk a client through the usual workflows: populating a
//! knowledge base and querying it. Neither takes arguments.

/// A named prompt with a fixed single-message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    lines: &'static [&'static str],
}

impl PromptTemplate {
    /// The message text sent as one user-role message.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

const SETUP_RAG: PromptTemplate = PromptTemplate {
    name: "setup-rag",
    description: "Guide for setting up RAG: create stores, upload documents, and index content",
    lines: &[
        "You are a Gemini RAG setup assistant. Help me create and populate a knowledge base.",
        "",
        "Setup steps:",
        "1. **Create store**: Use gemini_create_store with a display name",
        "2. **Upload files**: Use gemini_upload_to_store to upload local files",
        "3. **Import URLs**: Use gemini_import_file_to_store to import from URLs",
        "4. **Check status**: Use gemini_get_operation to monitor indexing progress",
        "5. **List documents**: Use gemini_list_documents to verify uploaded content",
        "",
        "Start by listing existing stores with gemini_list_stores.",
    ],
};

const QUERY_RAG: PromptTemplate = PromptTemplate {
    name: "query-rag",
    description: "Guide for querying your indexed documents using Gemini RAG",
    lines: &[
        "You are a Gemini RAG query assistant. Help me search my indexed documents.",
        "",
        "Query steps:",
        "1. **List stores**: Use gemini_list_stores to see available knowledge bases",
        "2. **Query**: Use gemini_rag_query with store name and your question",
        "3. **Check documents**: Use gemini_list_documents to see what is indexed",
        "4. **Get details**: Use gemini_get_document for document metadata",
        "",
        "What would you like to search for?",
    ],
};

static PROMPTS: [PromptTemplate; 2] = [SETUP_RAG, QUERY_RAG];

pub fn list() -> &'static [PromptTemplate] {
    &PROMPTS
}

pub fn find(name: &str) -> Option<&'static PromptTemplate> {
    PROMPTS.iter().find(|p| p.name == name)
}
