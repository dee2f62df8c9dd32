//! Ordered candidate files for one load.
//!
//! Precedence runs from the first candidate to the last: the core file, then
//! the extension file, then the override. Only files that exist are returned.
//! Each slot is probed once per registered format, in sorted extension order.

use camino::{Utf8Path, Utf8PathBuf};
use langpack_common::ParserRegistry;
use log::debug;

use crate::metadata::MetadataSource;

/// Which layer a candidate file belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Slot {
    Core,
    Extension,
    Override,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Candidate {
    pub(super) slot: Slot,
    pub(super) path: Utf8PathBuf,
}

/// Inputs that decide where a load looks.
pub(super) struct Lookup<'a, M> {
    pub(super) registry: &'a ParserRegistry,
    pub(super) source: &'a M,
    pub(super) base: &'a Utf8Path,
    pub(super) tag: &'a str,
    pub(super) default_tag: &'a str,
}

impl<M: MetadataSource> Lookup<'_, M> {
    pub(super) fn candidates(&self, extension: Option<&str>) -> Vec<Candidate> {
        let directory = self.source.language_path(self.base, self.tag);
        let mut candidates = self.probe(Slot::Core, &directory, self.tag);

        if let Some(name) = extension {
            let mut own = self.probe(Slot::Extension, &directory, name);
            if own.is_empty() && self.default_tag != self.tag {
                let fallback = self.source.language_path(self.base, self.default_tag);
                own = self.probe(Slot::Extension, &fallback, name);
                if !own.is_empty() {
                    debug!(
                        target: "langpack::language",
                        "using {} strings for `{name}`",
                        self.default_tag,
                    );
                }
            }
            candidates.append(&mut own);
        }

        let override_path = self.source.override_path(self.base, self.tag);
        if override_path.is_file() {
            candidates.push(Candidate {
                slot: Slot::Override,
                path: override_path,
            });
        } else {
            debug!(target: "langpack::language", "no override at {override_path}");
        }

        candidates
    }

    fn probe(&self, slot: Slot, directory: &Utf8Path, stem: &str) -> Vec<Candidate> {
        self.registry
            .extensions()
            .map(|format| directory.join(format!("{stem}.{format}")))
            .filter(|path| {
                let found = path.is_file();
                if !found {
                    debug!(target: "langpack::language", "skipping missing {path}");
                }
                found
            })
            .map(|path| Candidate { slot, path })
            .collect()
    }
}
