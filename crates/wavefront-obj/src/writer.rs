//! OBJ text output for any [`GeometrySource`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use wavefront_core::{Attrib, AttribSet, GeometrySource, MeshBuffers};

/// Which optional attributes the writer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    pub include_normals: bool,
    pub include_tex_coords: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            include_normals: true,
            include_tex_coords: true,
        }
    }
}

/// Errors from [`write_obj`].
#[derive(Debug, thiserror::Error)]
pub enum WriteError<E: std::error::Error + 'static> {
    #[error("geometry source failed: {0}")]
    Source(#[source] E),

    #[error("I/O error writing OBJ: {0}")]
    Io(#[from] io::Error),
}

/// Write `source` as OBJ text: one `v` (and `vt`/`vn` when included and
/// available) line per source vertex, then one `f` line per triangle.
pub fn write_obj<W: Write, S: GeometrySource>(
    out: W,
    source: &S,
    options: &WriteOptions,
) -> Result<(), WriteError<S::Error>> {
    let mut requested = AttribSet::from(Attrib::Position);
    if options.include_normals {
        requested.insert(Attrib::Normal);
    }
    if options.include_tex_coords {
        requested.insert(Attrib::TexCoord0);
    }

    let mut buffers = MeshBuffers::new();
    source
        .load_into(&mut buffers, requested.intersection(source.available_attribs()))
        .map_err(WriteError::Source)?;

    let mut out = BufWriter::new(out);
    let count = buffers.vertex_count();
    let has_normals = buffers.has(Attrib::Normal);
    let has_tex_coords = buffers.has(Attrib::TexCoord0);

    writeln!(out, "# {} vertices, {} triangles", count, buffers.indices.len() / 3)?;
    for i in 0..count {
        let [x, y, z] = buffers.position(i);
        writeln!(out, "v {x} {y} {z}")?;
    }
    if has_tex_coords {
        for i in 0..count {
            let [u, v] = buffers.tex_coord(i);
            writeln!(out, "vt {u} {v}")?;
        }
    }
    if has_normals {
        for i in 0..count {
            let [x, y, z] = buffers.normal(i);
            writeln!(out, "vn {x} {y} {z}")?;
        }
    }

    for triangle in buffers.triangles() {
        write!(out, "f")?;
        for index in triangle {
            let n = index + 1;
            match (has_tex_coords, has_normals) {
                (true, true) => write!(out, " {n}/{n}/{n}")?,
                (true, false) => write!(out, " {n}/{n}")?,
                (false, true) => write!(out, " {n}//{n}")?,
                (false, false) => write!(out, " {n}")?,
            }
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

/// [`write_obj`] into a newly created file.
pub fn write_obj_file<S: GeometrySource>(
    path: &Path,
    source: &S,
    options: &WriteOptions,
) -> Result<(), WriteError<S::Error>> {
    let file = File::create(path)?;
    write_obj(file, source, options)?;
    info!("Wrote OBJ to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::loader::ObjLoader;

    const TEXTURED: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    fn write(loader: &ObjLoader, options: WriteOptions) -> String {
        let mut out = Vec::new();
        write_obj(&mut out, loader, &options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_all_attributes() {
        let loader = ObjLoader::from_text(TEXTURED, LoadOptions::default());
        let text = write(&loader, WriteOptions::default());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "# 4 vertices, 2 triangles");
        assert_eq!(lines[1], "v 0 0 0");
        assert_eq!(lines[7], "vt 1 1");
        assert_eq!(lines[9], "vn 0 0 1");
        assert_eq!(lines[13], "f 1/1/1 2/2/2 3/3/3");
        assert_eq!(lines[14], "f 1/1/1 3/3/3 4/4/4");
    }

    #[test]
    fn omits_excluded_attributes() {
        let loader = ObjLoader::from_text(TEXTURED, LoadOptions::default());

        let text = write(
            &loader,
            WriteOptions {
                include_normals: false,
                include_tex_coords: true,
            },
        );
        assert!(!text.contains("vn "));
        assert!(text.contains("f 1/1 2/2 3/3"));

        let text = write(
            &loader,
            WriteOptions {
                include_normals: true,
                include_tex_coords: false,
            },
        );
        assert!(!text.contains("vt "));
        assert!(text.contains("f 1//1 2//2 3//3"));
    }

    #[test]
    fn positions_only_faces() {
        let loader = ObjLoader::from_text("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", LoadOptions::default());
        let text = write(&loader, WriteOptions::default());
        assert!(text.ends_with("f 1 2 3\n"));
    }

    #[test]
    fn failed_source_is_reported() {
        let loader = ObjLoader::from_text("f 1 2 3\n", LoadOptions::default());
        let mut out = Vec::new();
        let err = write_obj(&mut out, &loader, &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, WriteError::Source(_)));
        assert!(out.is_empty());
    }
}
