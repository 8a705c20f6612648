//! Direct DOCX text extraction from `word/document.xml`.
//!
//! Walks the WordprocessingML body in document order: paragraphs become
//! lines, table rows become `cell | cell` lines. Blank paragraphs and blank
//! rows are skipped. This is the cheap first tier; documents that defeat it
//! (text boxes, exotic parts) fall through to the structural parser.

use crate::providers::DocxTextReader;
use crate::{Result, TextliftError};
use async_trait::async_trait;
use roxmltree::{Document, Node};
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

/// [`DocxTextReader`] backed by ZIP + streaming-free XML parsing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipDocxReader;

fn read_document_xml(bytes: &[u8]) -> Result<String> {
    let cursor = Cursor::new(bytes);
    let mut archive =
        ZipArchive::new(cursor).map_err(|e| TextliftError::parsing_with_source("Failed to open DOCX as ZIP", e))?;

    let mut file = archive
        .by_name("word/document.xml")
        .map_err(|e| TextliftError::parsing_with_source("DOCX has no word/document.xml", e))?;

    let mut content = String::new();
    std::io::Read::read_to_string(&mut file, &mut content)
        .map_err(|e| TextliftError::parsing_with_source("Failed to read document.xml", e))?;
    Ok(content)
}

/// Concatenated text of all `w:t` descendants of a node.
fn collect_text(node: Node<'_, '_>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        if descendant.tag_name().name() == "t"
            && let Some(value) = descendant.text()
        {
            text.push_str(value);
        }
    }
    text
}

fn table_lines(table: Node<'_, '_>, lines: &mut Vec<String>) {
    // Direct rows only. A table nested inside a cell is already covered by
    // the outer cell's text walk.
    for row in table.children().filter(|n| n.tag_name().name() == "tr") {
        let cells: Vec<String> = row
            .children()
            .filter(|n| n.tag_name().name() == "tc")
            .map(|cell| collect_text(cell).trim().to_string())
            .filter(|cell| !cell.is_empty())
            .collect();
        if !cells.is_empty() {
            lines.push(cells.join(" | "));
        }
    }
}

pub(crate) fn extract_body_text(bytes: &[u8]) -> Result<String> {
    let xml = read_document_xml(bytes)?;
    let doc = Document::parse(&xml).map_err(|e| TextliftError::parsing_with_source("Invalid document.xml", e))?;

    let body = doc
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "body")
        .ok_or_else(|| TextliftError::parsing("document.xml has no body element"))?;

    let mut lines = Vec::new();
    for child in body.children() {
        match child.tag_name().name() {
            "p" => {
                let text = collect_text(child);
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
            }
            "tbl" => table_lines(child, &mut lines),
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

#[async_trait]
impl DocxTextReader for ZipDocxReader {
    async fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        extract_body_text(&bytes)
    }
}
