// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! MovingAI grid map parsing.
//!
//! ```text
//! type octile
//! height 2
//! width 3
//! map
//! ..@
//! ...
//! ```

use crate::error::LoadError;

/// Characters that mark an obstacle cell.
const OBSTACLES: [char; 4] = ['@', 'T', 'O', 'W'];

/// Raw grid read from a map file: dimensions and per-cell passability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    pub width: usize,
    pub height: usize,
    /// Row-major, `true` for free cells.
    pub free: Vec<bool>,
}

impl GridMap {
    /// Parse the text of a map file.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

        let mut width = None;
        let mut height = None;
        let mut body_found = false;
        for line in lines.by_ref() {
            let mut words = line.split_whitespace();
            match words.next() {
                Some("height") => height = Some(header_value("height", words.next())?),
                Some("width") => width = Some(header_value("width", words.next())?),
                Some("map") => {
                    body_found = true;
                    break;
                }
                _ => {}
            }
        }

        let height = height.ok_or(LoadError::MissingHeader("height"))?;
        let width = width.ok_or(LoadError::MissingHeader("width"))?;
        if !body_found {
            return Err(LoadError::MissingHeader("map"));
        }

        let mut free = Vec::with_capacity(width * height);
        let mut rows = 0;
        for (row, line) in lines.take(height).enumerate() {
            let cells: Vec<char> = line.chars().take(width).collect();
            if cells.len() < width {
                return Err(LoadError::ShortRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            free.extend(cells.iter().map(|c| !OBSTACLES.contains(c)));
            rows += 1;
        }
        if rows < height {
            return Err(LoadError::MissingRows {
                expected: height,
                found: rows,
            });
        }

        Ok(Self {
            width,
            height,
            free,
        })
    }
}

fn header_value(key: &'static str, value: Option<&str>) -> Result<usize, LoadError> {
    let value = value.ok_or(LoadError::MissingHeader(key))?;
    value.parse().map_err(|_| LoadError::InvalidHeader {
        key,
        value: value.to_string(),
    })
}
