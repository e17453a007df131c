// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Name ordering for catalog lists.
//!
//! Catalog names are Spanish (`Economía`, `Muñoz`, ...). Lists are ordered with
//! base-letter sensitivity: case and vowel accents are ignored, but `ñ` is its
//! own letter and sorts between `n` and `o`.

use crate::types::Named;
use std::cmp::Ordering;
use std::iter;

/// Folds one character to its base letter at primary strength.
///
/// Ligatures expand to two letters. `ñ` is kept as is.
fn base_letters(c: char) -> (char, Option<char>) {
    let lower: char = c.to_lowercase().next().unwrap_or(c);
    let base: char = match lower {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' => 'l',
        'ń' | 'ň' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' => 't',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        'æ' => return ('a', Some('e')),
        'œ' => return ('o', Some('e')),
        'ß' => return ('s', Some('s')),
        other => other,
    };
    (base, None)
}

/// Primary collation weight of a base letter.
///
/// Weights are spaced by two so that `ñ` can slot in right after `n`.
fn primary_weight(base: char) -> u32 {
    if base == 'ñ' {
        u32::from('n') * 2 + 1
    } else {
        u32::from(base) * 2
    }
}

fn primary_weights(name: &str) -> impl Iterator<Item = u32> + '_ {
    name.chars()
        .flat_map(|c| {
            let (first, second) = base_letters(c);
            iter::once(first).chain(second)
        })
        .map(primary_weight)
}

/// Compares two names at base-letter strength.
///
/// Names that are equal at that strength (`"Ana"` vs `"ana"`) fall back to a
/// code point comparison so the ordering stays total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_weights(a)
        .cmp(primary_weights(b))
        .then_with(|| a.cmp(b))
}

/// Sorts catalog entries ascending by display name.
pub fn sort_by_name<T: Named>(items: &mut [T]) {
    items.sort_by(|a, b| compare_names(a.name(), b.name()));
}
