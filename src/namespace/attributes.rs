/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// A namespace resolved attribute of an element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    uri: String,
    qname: String,
    local_start: usize,
    value: String,
}

impl Attribute {
    /// Namespace URI, empty for unprefixed attributes.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Qualified name as written in the document.
    pub fn qname(&self) -> &str {
        &self.qname
    }

    pub fn local_name(&self) -> &str {
        &self.qname[self.local_start..]
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Attributes of an element in document order.
///
/// Namespace declarations are consumed by the parser and never show up here.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attributes {
    list: Vec<Attribute>,
}

impl Attributes {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.list.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.list.iter()
    }

    /// Looks up an attribute value by its qualified name.
    pub fn value(&self, qname: &str) -> Option<&str> {
        self.list
            .iter()
            .find(|attr| attr.qname == qname)
            .map(|attr| attr.value.as_str())
    }

    /// Looks up an attribute value by namespace URI and local name.
    pub fn value_ns(&self, uri: &str, local_name: &str) -> Option<&str> {
        self.list
            .iter()
            .find(|attr| attr.uri == uri && attr.local_name() == local_name)
            .map(|attr| attr.value.as_str())
    }

    pub(super) fn clear(&mut self) {
        self.list.clear();
    }

    // Returns false if the attribute is a duplicate.
    pub(super) fn push(&mut self, uri: &str, qname: &str, local_start: usize, value: &str) -> bool {
        let local_name = &qname[local_start..];
        if self.list.iter().any(|attr| {
            attr.qname == qname || (!uri.is_empty() && attr.uri == uri && attr.local_name() == local_name)
        }) {
            return false;
        }
        self.list.push(Attribute {
            uri: uri.to_string(),
            qname: qname.to_string(),
            local_start,
            value: value.to_string(),
        });
        true
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
