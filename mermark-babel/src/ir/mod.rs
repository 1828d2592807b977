//! Intermediate Representation (IR) for converted documents.
//!
//! Both directions meet here: the Markdown and HTML parsers produce a
//! [`nodes::Document`], and the serializers consume one. Fenced code and
//! diagrams never enter block parsing; they are held aside in
//! `Document::protected` and referenced by placeholder id.

pub mod nodes;
