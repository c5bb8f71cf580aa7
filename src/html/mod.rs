//! Markup parsing and serialization
//!
//! The parser stands in for a browser's inert `<template>` facility: it turns
//! a string of HTML into a tree without running anything, and the result is
//! then materialized into a [`Document`](crate::dom::Document).

pub mod ast;
mod grammar;
pub mod lexer;
pub mod serialize;

pub use ast::{is_void_element, Attribute, Fragment, Markup, Spanned, StartTag};
pub use grammar::parse;
pub use serialize::{escape_attribute, escape_text, inner_html, outer_html};
