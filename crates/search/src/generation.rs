use crate::retriever::Retrieval;
use metagraph_graph::StructuredContext;
use serde::Serialize;

/// What the generation step receives: the untouched query and its context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub query: String,
    pub context: StructuredContext,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>, context: StructuredContext) -> Self {
        Self {
            query: query.into(),
            context,
        }
    }

    /// Text-to-SQL prompt for a completion backend
    pub fn render_prompt(&self, database_label: &str) -> String {
        // a rendered context ends in a blank line; keep that spacing when it is empty
        let context = if self.context.is_empty() {
            "\n".to_string()
        } else {
            self.context.to_string()
        };
        format!(
            "You are a text-to-SQL conversion model.\n\
             Convert the following natural language query to a SQL query based on the {database_label} database.\n\
             Use the provided schema context to help you.\n\
             \n\
             Schema Context:\n\
             {context}\
             Natural Language Query:\n\
             {query}\n\
             \n\
             SQL Query:\n",
            query = self.query,
        )
    }
}

impl From<Retrieval> for GenerationRequest {
    fn from(retrieval: Retrieval) -> Self {
        Self::new(retrieval.query, retrieval.context)
    }
}
