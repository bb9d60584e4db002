//! Pair matcher: join image and text candidates on base name.

use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::utils::config::image_extension_priority;
use crate::{Candidate, Pair};

/// Candidate ordering when several share a base name: extension priority, then file name.
fn preference(a: &Candidate, b: &Candidate) -> Ordering {
    let pa = image_extension_priority(&a.extension).unwrap_or(usize::MAX);
    let pb = image_extension_priority(&b.extension).unwrap_or(usize::MAX);
    pa.cmp(&pb).then_with(|| a.file_name().cmp(&b.file_name()))
}

/// Keep the preferred candidate per base name.
fn best_by_base_name(candidates: &[Candidate]) -> BTreeMap<&str, &Candidate> {
    let mut best: BTreeMap<&str, &Candidate> = BTreeMap::new();
    for c in candidates {
        match best.get(c.base_name.as_str()) {
            Some(current) if preference(current, c) != Ordering::Greater => {
                debug!(
                    "Ignoring {}: {} takes precedence",
                    c.full_path.display(),
                    current.file_name()
                );
            }
            Some(current) => {
                debug!(
                    "Ignoring {}: {} takes precedence",
                    current.full_path.display(),
                    c.file_name()
                );
                best.insert(&c.base_name, c);
            }
            None => {
                best.insert(&c.base_name, c);
            }
        }
    }
    best
}

/// One pair per base name present on both sides, ordered by base name.
///
/// Images sharing a base name are resolved by [`IMAGE_EXTENSIONS`](crate::utils::config::IMAGE_EXTENSIONS)
/// order (`jpeg`, `jpg`, `png`, `tiff`); equal extensions and duplicate text files fall back
/// to the smaller file name.
pub fn match_pairs(images: &[Candidate], texts: &[Candidate]) -> Vec<Pair> {
    let images = best_by_base_name(images);
    let texts = best_by_base_name(texts);
    images
        .into_iter()
        .filter_map(|(base, image)| {
            texts.get(base).map(|text| Pair {
                image: image.clone(),
                text: (*text).clone(),
            })
        })
        .collect()
}
