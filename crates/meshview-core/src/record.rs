//! Line grammar shared by mesh (OBJ) and material (MTL) files.
//!
//! Each non-blank, non-comment line is classified by its first token into a
//! closed set of [`Record`] kinds. Which keywords are recognized depends on the
//! [`Dialect`]; anything else falls through to [`Record::Other`], which keeps its
//! numeric payload when one parses.
//!
//! Only vertex and face lines of a mesh are strict: a bad one fails the file.
//! Other unusable lines are skipped with a warning.

use std::path::Path;

use glam::Vec3;

use crate::error::{MeshviewError, Result};

/// Comment marker at the start of a line.
pub const COMMENT_MARKER: char = '#';

/// Which file format a text is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Wavefront mesh: `v`, `vn`, `f`, `mtllib`, `usemtl`.
    Obj,
    /// Material library: `newmtl`, `map_Kd`, and numeric properties.
    Mtl,
}

impl Dialect {
    fn recognizes(self, keyword: &str) -> bool {
        match self {
            Self::Obj => matches!(keyword, "v" | "vn" | "f" | "mtllib" | "usemtl"),
            Self::Mtl => matches!(keyword, "newmtl" | "map_Kd"),
        }
    }

    /// Whether a malformed line with this keyword fails the whole file.
    pub fn is_strict(self, keyword: &str) -> bool {
        self == Self::Obj && matches!(keyword, "v" | "f")
    }
}

/// One classified line of an asset file.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<'a> {
    /// `v x y z`
    Vertex(Vec3),
    /// `vn x y z`
    Normal(Vec3),
    /// `f a b c ...`, raw OBJ references (1-based, negative = relative).
    Face(Vec<i64>),
    /// `newmtl name`
    NewMaterial(&'a str),
    /// `map_Kd path`
    DiffuseMap(&'a str),
    /// `mtllib file`
    MaterialLibrary(&'a str),
    /// `usemtl name`
    UseMaterial(&'a str),
    /// Any other keyword. `payload` is `None` when the values are not all numeric.
    Other {
        keyword: &'a str,
        payload: Option<Vec<f32>>,
    },
}

impl<'a> Record<'a> {
    /// Classifies one line. Returns `Ok(None)` for blank and comment lines.
    ///
    /// The error string describes what is wrong with the line; callers attach the
    /// file and line number.
    pub fn parse(line: &'a str, dialect: Dialect) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(None);
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };
        let rest: Vec<&'a str> = tokens.collect();

        if !dialect.recognizes(keyword) {
            return Ok(Some(Self::other(keyword, &rest)));
        }
        let record = match keyword {
            "v" => Self::Vertex(parse_vec3(keyword, &rest)?),
            "vn" => Self::Normal(parse_vec3(keyword, &rest)?),
            "f" => Self::Face(parse_face(&rest)?),
            "newmtl" => Self::NewMaterial(single_value(keyword, &rest)?),
            // Options such as `-s 1 1 1` may precede the file name; it is always last.
            "map_Kd" => Self::DiffuseMap(
                rest.last()
                    .copied()
                    .ok_or_else(|| format!("'{keyword}' needs a value"))?,
            ),
            "mtllib" => Self::MaterialLibrary(single_value(keyword, &rest)?),
            "usemtl" => Self::UseMaterial(single_value(keyword, &rest)?),
            _ => Self::other(keyword, &rest),
        };
        Ok(Some(record))
    }

    fn other(keyword: &'a str, values: &[&str]) -> Self {
        Self::Other {
            keyword,
            payload: values
                .iter()
                .map(|t| t.parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .ok(),
        }
    }
}

/// Iterates over the records of `text`, tagging each with its 1-based line number.
///
/// Errors on strict keywords are reported as [`MeshviewError::MalformedAsset`]
/// against `path`; other malformed lines are logged and skipped.
pub fn records<'a>(
    path: &'a Path,
    text: &'a str,
    dialect: Dialect,
) -> impl Iterator<Item = Result<(usize, Record<'a>)>> + 'a {
    text.lines().enumerate().filter_map(move |(idx, line)| {
        let line_no = idx + 1;
        match Record::parse(line, dialect) {
            Ok(Some(record)) => Some(Ok((line_no, record))),
            Ok(None) => None,
            Err(reason) => {
                let keyword = line.split_whitespace().next().unwrap_or_default();
                if dialect.is_strict(keyword) {
                    Some(Err(MeshviewError::MalformedAsset {
                        path: path.to_path_buf(),
                        line: line_no,
                        reason,
                    }))
                } else {
                    log::warn!("{}:{line_no}: {reason}, line skipped", path.display());
                    None
                }
            }
        }
    })
}

fn parse_vec3(keyword: &str, values: &[&str]) -> std::result::Result<Vec3, String> {
    if values.len() < 3 {
        return Err(format!(
            "'{keyword}' needs 3 coordinates, got {}",
            values.len()
        ));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, token) in xyz.iter_mut().zip(values) {
        *slot = token
            .parse()
            .map_err(|_| format!("'{keyword}' coordinate '{token}' is not a number"))?;
    }
    Ok(Vec3::from_array(xyz))
}

fn parse_face(values: &[&str]) -> std::result::Result<Vec<i64>, String> {
    if values.len() < 3 {
        return Err(format!(
            "face needs at least 3 vertex references, got {}",
            values.len()
        ));
    }
    values
        .iter()
        .map(|token| {
            // Texture and normal sub-indices after '/' are not used.
            let vertex = token.split('/').next().unwrap_or_default();
            vertex
                .parse::<i64>()
                .map_err(|_| format!("face reference '{token}' is not an index"))
        })
        .collect()
}

fn single_value<'a>(keyword: &str, values: &[&'a str]) -> std::result::Result<&'a str, String> {
    values
        .first()
        .copied()
        .ok_or_else(|| format!("'{keyword}' needs a value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(line: &str) -> std::result::Result<Option<Record<'_>>, String> {
        Record::parse(line, Dialect::Obj)
    }

    fn mtl(line: &str) -> std::result::Result<Option<Record<'_>>, String> {
        Record::parse(line, Dialect::Mtl)
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(obj(""), Ok(None));
        assert_eq!(obj("   \t "), Ok(None));
        assert_eq!(mtl("# exported by hmr2"), Ok(None));
    }

    #[test]
    fn test_vertex_takes_first_three_values() {
        assert_eq!(
            obj("v 1 2.5 -3 1.0"),
            Ok(Some(Record::Vertex(Vec3::new(1.0, 2.5, -3.0))))
        );
        assert!(obj("v 1 2").is_err());
        assert!(obj("v 1 two 3").is_err());
    }

    #[test]
    fn test_face_ignores_sub_indices() {
        assert_eq!(obj("f 1/4/7 2//8 3"), Ok(Some(Record::Face(vec![1, 2, 3]))));
        assert_eq!(obj("f -3 -2 -1"), Ok(Some(Record::Face(vec![-3, -2, -1]))));
        assert!(obj("f 1 2").is_err());
    }

    #[test]
    fn test_material_keywords() {
        assert_eq!(mtl("newmtl skin"), Ok(Some(Record::NewMaterial("skin"))));
        assert_eq!(
            mtl("map_Kd -s 1 1 1 tex/skin.png"),
            Ok(Some(Record::DiffuseMap("tex/skin.png")))
        );
        assert!(mtl("newmtl").is_err());
    }

    #[test]
    fn test_other_keeps_numeric_payload() {
        assert_eq!(
            mtl("Kd 0.5 0.25 1"),
            Ok(Some(Record::Other {
                keyword: "Kd",
                payload: Some(vec![0.5, 0.25, 1.0])
            }))
        );
        assert_eq!(
            mtl("illum high"),
            Ok(Some(Record::Other {
                keyword: "illum",
                payload: None
            }))
        );
    }

    #[test]
    fn test_mesh_keywords_are_plain_properties_in_materials() {
        assert_eq!(
            mtl("v 1 x 2"),
            Ok(Some(Record::Other {
                keyword: "v",
                payload: None
            }))
        );
        assert_eq!(
            mtl("usemtl"),
            Ok(Some(Record::Other {
                keyword: "usemtl",
                payload: Some(vec![])
            }))
        );
        assert!(matches!(obj("newmtl"), Ok(Some(Record::Other { .. }))));
    }

    #[test]
    fn test_only_vertex_and_face_are_strict() {
        assert!(Dialect::Obj.is_strict("v"));
        assert!(Dialect::Obj.is_strict("f"));
        assert!(!Dialect::Obj.is_strict("vn"));
        assert!(!Dialect::Obj.is_strict("usemtl"));
        assert!(!Dialect::Mtl.is_strict("newmtl"));
        assert!(!Dialect::Mtl.is_strict("v"));
    }

    #[test]
    fn test_records_report_line_numbers() {
        let text = "# header\n\nv 0 0 0\nv 1 x 0\n";
        let path = Path::new("bad.obj");
        let results: Vec<_> = records(path, text, Dialect::Obj).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Ok((3, Record::Vertex(_)))));
        match &results[1] {
            Err(MeshviewError::MalformedAsset { line, .. }) => assert_eq!(*line, 4),
            other => panic!("expected malformed asset, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_lines_are_skipped() {
        let text = "usemtl\nvn 0 1\nmtllib\nv 0 0 0\n";
        let path = Path::new("model.obj");
        let results: Vec<_> = records(path, text, Dialect::Obj).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Ok((4, Record::Vertex(_)))));
    }
}
