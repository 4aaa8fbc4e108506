// Copyright 2026 Acceptance Harness Contributors
// Licensed under the Apache License, Version 2.0
//
// Page Registry - Creates page objects from kind tags
//
// The application reports item types as strings (e.g.
// "hudson.model.FreeStyleProject"). The registry maps those kind tags to page
// object constructors so that a page can be resolved for an item whose type
// is only known at runtime. Registration happens while the context is set up;
// an unknown tag is an error, never a silent fallback.

use crate::context::Context;
use crate::error::{ResolutionError, Result};
use crate::page::{PageBase, PageObject};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Type-erased page object produced by the registry.
pub trait DynPage: Send + Sync {
    fn page_base(&self) -> &PageBase;

    /// Rust type name of the concrete page object
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: PageObject> DynPage for T {
    fn page_base(&self) -> &PageBase {
        self.base()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

type Factory = fn(PageBase) -> Box<dyn DynPage>;

#[derive(Clone, Copy)]
struct Registration {
    type_name: &'static str,
    factory: Factory,
}

fn construct<T: PageObject>(base: PageBase) -> Box<dyn DynPage> {
    Box::new(T::from_base(base))
}

/// Kind tag to page constructor table.
#[derive(Default)]
pub struct PageRegistry {
    entries: RwLock<HashMap<String, Registration>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` as the page object for items of `kind`.
    ///
    /// Fails if the kind is already taken, if `T`'s descriptor is malformed,
    /// or if `T` declares a different kind than the one given.
    pub fn register<T: PageObject>(&self, kind: &str) -> Result<()> {
        let type_name = std::any::type_name::<T>();

        if kind.trim().is_empty() {
            return Err(ResolutionError::InvalidDescriptor {
                page: type_name,
                reason: "registered under an empty kind".to_string(),
            }
            .into());
        }
        T::DESCRIPTOR.validate(type_name)?;
        if let Some(declared) = T::DESCRIPTOR.kind
            && declared != kind
        {
            return Err(ResolutionError::InvalidDescriptor {
                page: type_name,
                reason: format!("declares kind '{declared}' but was registered as '{kind}'"),
            }
            .into());
        }

        let mut entries = self.entries.write();
        if entries.contains_key(kind) {
            return Err(ResolutionError::DuplicateKind(kind.to_string()).into());
        }
        entries.insert(
            kind.to_string(),
            Registration {
                type_name,
                factory: construct::<T>,
            },
        );
        tracing::debug!("Registered page kind '{}' -> {}", kind, type_name);
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.read().contains_key(kind)
    }

    /// Registered kind tags, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.entries.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Constructs the page object registered for `kind` at `url`.
    pub fn resolve(&self, kind: &str, context: &Arc<Context>, url: Url) -> Result<Box<dyn DynPage>> {
        let registration = self.entries.read().get(kind).copied();
        let Some(registration) = registration else {
            tracing::warn!("No page factory registered for kind '{}'", kind);
            return Err(ResolutionError::UnknownKind(kind.to_string()).into());
        };

        tracing::debug!("Resolving kind '{}' as {} at {}", kind, registration.type_name, url);
        Ok((registration.factory)(PageBase::new(context, url)))
    }

    /// Like [`resolve`](Self::resolve), but checks the result is a `T`.
    pub fn resolve_as<T: PageObject>(&self, kind: &str, context: &Arc<Context>, url: Url) -> Result<T> {
        let page = self.resolve(kind, context, url)?;
        let actual = page.type_name();
        match page.into_any().downcast::<T>() {
            Ok(page) => Ok(*page),
            Err(_) => Err(ResolutionError::KindMismatch {
                kind: kind.to_string(),
                expected: std::any::type_name::<T>(),
                actual,
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
