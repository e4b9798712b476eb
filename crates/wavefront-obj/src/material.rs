//! MTL material records.

use std::collections::HashMap;
use std::io::{self, BufRead};

use tracing::{debug, warn};
use wavefront_core::Color;

use crate::error::ObjWarning;
use crate::scanner::LineScanner;

/// Index of a material in its owning [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// A named material. Only the ambient and diffuse colors are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// `Ka`, black unless set.
    pub ambient: Color,
    /// `Kd`, white unless set.
    pub diffuse: Color,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Color::BLACK,
            diffuse: Color::WHITE,
        }
    }
}

/// Materials by name, stored in definition order.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material. Redefining a name replaces the earlier record but
    /// keeps its id.
    pub fn insert(&mut self, material: Material) -> MaterialId {
        if let Some(&id) = self.by_name.get(&material.name) {
            self.materials[id.0] = material;
            return id;
        }
        let id = MaterialId(self.materials.len());
        self.by_name.insert(material.name.clone(), id);
        self.materials.push(material);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Material> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}

fn parse_color(args: &[&str]) -> Option<Color> {
    if args.len() < 3 {
        return None;
    }
    let r = args[0].parse::<f32>().ok()?;
    let g = args[1].parse::<f32>().ok()?;
    let b = args[2].parse::<f32>().ok()?;
    Some(Color::rgb(r, g, b))
}

/// Read `newmtl`/`Ka`/`Kd` statements from `reader` into `table`.
///
/// Malformed color statements are skipped and reported in `warnings`. Only
/// a failing reader is an error; records completed before the failure are
/// kept.
pub fn parse_materials<R: BufRead>(
    reader: R,
    table: &mut MaterialTable,
    warnings: &mut Vec<ObjWarning>,
) -> io::Result<()> {
    let mut current: Option<Material> = None;

    for line in LineScanner::new(reader) {
        let line = line?;
        let (keyword, args) = line.split();

        match keyword {
            "newmtl" => {
                if let Some(done) = current.take() {
                    table.insert(done);
                }
                current = Some(Material::new(line.rest()));
            }
            "Ka" | "Kd" => {
                let Some(material) = current.as_mut() else {
                    continue;
                };
                match parse_color(&args) {
                    Some(color) if keyword == "Ka" => material.ambient = color,
                    Some(color) => material.diffuse = color,
                    None => {
                        warn!("line {}: ignoring malformed '{}' statement", line.number, keyword);
                        warnings.push(ObjWarning::MalformedMaterialStatement {
                            line: line.number,
                            keyword: keyword.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(done) = current.take() {
        table.insert(done);
    }

    debug!("Material table holds {} materials", table.len());
    Ok(())
}
