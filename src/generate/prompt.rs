use crate::source::SourceDocument;

/// Build the user turn for the real API call. The system prompt (the large,
/// cacheable part) travels separately; this wraps just the document.
pub(crate) fn build_user_prompt(doc: &SourceDocument) -> String {
    format!(
        "Analyze the following HTML content and generate three social-media \
         post variants for it, following the system prompt.\n\n\
         <html_content>\n{}\n</html_content>",
        doc.content
    )
}
