//! OBJ statement parser.

use std::collections::HashSet;
use std::io::BufRead;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use tracing::{debug, info, warn};
use wavefront_core::Color;

use crate::config::LoadOptions;
use crate::error::{ObjError, ObjWarning};
use crate::material::{parse_materials, MaterialId, MaterialTable};
use crate::model::{Corner, Face, Group, LoadedModel};
use crate::scanner::{Line, LineScanner};
use crate::source::StreamSource;

const DEFAULT_GROUP: &str = "default";

/// Parse an OBJ stream into a [`LoadedModel`].
///
/// `mtllib` statements are opened through `source`; without one they are
/// reported as unavailable and the material table stays empty.
pub fn parse_obj<R: BufRead>(
    reader: R,
    source: Option<&dyn StreamSource>,
    options: &LoadOptions,
) -> Result<LoadedModel, ObjError> {
    ObjParser::new(options, source).parse(reader)
}

/// Accumulates one load. Consumed by [`ObjParser::parse`].
pub(crate) struct ObjParser<'a> {
    options: LoadOptions,
    source: Option<&'a dyn StreamSource>,
    model: LoadedModel,
    current: Option<Group>,
    active_material: Option<MaterialId>,
    loaded_libraries: HashSet<String>,
}

impl<'a> ObjParser<'a> {
    pub(crate) fn new(options: &LoadOptions, source: Option<&'a dyn StreamSource>) -> Self {
        Self {
            options: *options,
            source,
            model: LoadedModel::default(),
            current: None,
            active_material: None,
            loaded_libraries: HashSet::new(),
        }
    }

    /// Read a material stream before the OBJ statements.
    pub(crate) fn preload_materials<R: BufRead>(&mut self, name: &str, reader: R) {
        let result = parse_materials(reader, &mut self.model.materials, &mut self.model.warnings);
        if let Err(e) = result {
            self.material_stream_unavailable(name, &e.to_string());
        }
    }

    pub(crate) fn parse<R: BufRead>(mut self, reader: R) -> Result<LoadedModel, ObjError> {
        let mut scanner = LineScanner::new(reader);

        while let Some(line) = scanner.next() {
            let line = line.map_err(|e| ObjError::Read {
                line: scanner.physical_line(),
                source: Arc::new(e),
            })?;
            self.statement(&line)?;
        }

        self.close_group();

        let model = self.model;
        info!(
            "Loaded OBJ: {} groups, {} positions, {} normals, {} texcoords, {} materials",
            model.groups.len(),
            model.pools.positions.len(),
            model.pools.normals.len(),
            model.pools.tex_coords.len(),
            model.materials.len()
        );
        Ok(model)
    }

    fn statement(&mut self, line: &Line) -> Result<(), ObjError> {
        let (keyword, args) = line.split();

        match keyword {
            "v" => match parse_floats(&args, 3) {
                Some(values) => {
                    let color = (values.len() >= 6)
                        .then(|| Color::rgb(values[3], values[4], values[5]));
                    let position = Vec3::new(values[0], values[1], values[2]);
                    self.model.pools.push_position(position, color);
                }
                None => self.malformed_vertex(line, keyword),
            },
            "vn" => match parse_floats(&args, 3) {
                Some(values) => {
                    let normal = Vec3::new(values[0], values[1], values[2]);
                    self.model.pools.normals.push(normal);
                }
                None => self.malformed_vertex(line, keyword),
            },
            "vt" => match parse_floats(&args, 1) {
                Some(values) => {
                    let v = values.get(1).copied().unwrap_or(0.0);
                    self.model.pools.tex_coords.push(Vec2::new(values[0], v));
                }
                None => self.malformed_vertex(line, keyword),
            },
            "vc" => match parse_floats(&args, 3) {
                Some(values) => match self.model.pools.colors.last_mut() {
                    Some(slot) => *slot = Some(Color::rgb(values[0], values[1], values[2])),
                    None => self.malformed_vertex(line, keyword),
                },
                None => self.malformed_vertex(line, keyword),
            },
            "g" | "o" => {
                let name = if args.is_empty() {
                    DEFAULT_GROUP.to_string()
                } else {
                    args.join(" ")
                };
                self.close_group();
                self.current = Some(Group::new(name, &self.model.pools));
            }
            "usemtl" => {
                let name = line.rest();
                self.active_material = self.model.materials.lookup(name);
                if self.active_material.is_none() {
                    warn!("line {}: material '{}' is not defined", line.number, name);
                    self.model.warnings.push(ObjWarning::UnresolvedMaterialReference {
                        line: line.number,
                        name: name.to_string(),
                    });
                }
            }
            "mtllib" => {
                for name in args {
                    self.load_library(name);
                }
            }
            "f" => self.face(line, &args)?,
            _ => {}
        }

        Ok(())
    }

    fn face(&mut self, line: &Line, args: &[&str]) -> Result<(), ObjError> {
        if args.len() < 3 {
            warn!("line {}: ignoring face with {} corners", line.number, args.len());
            self.model.warnings.push(ObjWarning::DegenerateFace {
                line: line.number,
                corners: args.len(),
            });
            return Ok(());
        }

        let corners = args
            .iter()
            .map(|token| self.corner(line.number, token))
            .collect::<Result<Vec<_>, _>>()?;

        let face = Face {
            corners,
            material: self.active_material,
        };

        let pools = &self.model.pools;
        self.current
            .get_or_insert_with(|| Group::new(DEFAULT_GROUP, pools))
            .push_face(face);
        Ok(())
    }

    fn corner(&self, line: usize, token: &str) -> Result<Corner, ObjError> {
        let malformed = |reason: String| ObjError::MalformedFaceIndex {
            line,
            corner: token.to_string(),
            reason,
        };

        let parts: Vec<&str> = token.split('/').collect();
        if parts.len() > 3 {
            return Err(malformed("too many '/' separators".to_string()));
        }

        let pools = &self.model.pools;
        let position = resolve_index(parts[0], pools.positions.len(), "position")
            .map_err(&malformed)?;

        let tex_coord = match parts.get(1) {
            Some(part) if !part.is_empty() && self.options.load_tex_coords => Some(
                resolve_index(part, pools.tex_coords.len(), "texcoord").map_err(&malformed)?,
            ),
            _ => None,
        };

        let normal = match parts.get(2) {
            Some(part) if !part.is_empty() && self.options.load_normals => Some(
                resolve_index(part, pools.normals.len(), "normal").map_err(&malformed)?,
            ),
            _ => None,
        };

        Ok(Corner {
            position,
            tex_coord,
            normal,
        })
    }

    fn close_group(&mut self) {
        if let Some(group) = self.current.take() {
            if group.is_empty() {
                debug!("Discarding empty group '{}'", group.name);
            } else {
                debug!("Group '{}' closed with {} faces", group.name, group.faces.len());
                self.model.groups.push(group);
            }
        }
    }

    fn load_library(&mut self, name: &str) {
        if !self.loaded_libraries.insert(name.to_string()) {
            return;
        }

        let Some(source) = self.source else {
            self.material_stream_unavailable(name, "no stream source to open it from");
            return;
        };

        match source.open(name) {
            Ok(reader) => {
                debug!("Reading material library '{}'", name);
                let result =
                    parse_materials(reader, &mut self.model.materials, &mut self.model.warnings);
                if let Err(e) = result {
                    self.material_stream_unavailable(name, &e.to_string());
                }
            }
            Err(e) => self.material_stream_unavailable(name, &e.to_string()),
        }
    }

    fn material_stream_unavailable(&mut self, name: &str, reason: &str) {
        warn!("Material library '{}' unavailable: {}", name, reason);
        self.model.warnings.push(ObjWarning::MaterialStreamUnavailable {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    fn malformed_vertex(&mut self, line: &Line, keyword: &str) {
        warn!("line {}: ignoring malformed '{}' statement", line.number, keyword);
        self.model.warnings.push(ObjWarning::MalformedVertexStatement {
            line: line.number,
            keyword: keyword.to_string(),
        });
    }
}

/// All arguments as floats, if there are at least `min` and every one parses.
fn parse_floats(args: &[&str], min: usize) -> Option<Vec<f32>> {
    if args.len() < min {
        return None;
    }
    args.iter().map(|a| a.parse::<f32>().ok()).collect()
}

/// Resolve a 1-based or negative (relative to the end) OBJ index against a
/// pool of `len` entries.
fn resolve_index(token: &str, len: usize, kind: &str) -> Result<usize, String> {
    let raw: i64 = token
        .parse()
        .map_err(|_| format!("{kind} index '{token}' is not an integer"))?;

    let resolved = match raw {
        0 => return Err(format!("{kind} index 0 is not valid")),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };

    if resolved < 0 || resolved >= len as i64 {
        return Err(format!("{kind} index {raw} is out of range ({len} defined)"));
    }
    Ok(resolved as usize)
}
