use crate::core::scene_object::{DEFAULT_NORMAL, SceneObject};
use crate::material_system::texture::Texture;
use log::{debug, info, warn};
use nalgebra::{Vector2, Vector3};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Triangle soup read from an OBJ file, three consecutive vertices per
/// triangle, attributes already expanded per vertex.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub positions: Vec<Vector3<f32>>,
    pub texcoords: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    /// First diffuse texture named by the MTL file, relative to the OBJ.
    pub texture_path: Option<PathBuf>,
}

impl ObjMesh {
    pub fn num_triangles(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn into_scene_object(self, texture: Arc<Texture>) -> Result<SceneObject, String> {
        SceneObject::new(self.positions, self.texcoords, self.normals, texture)
    }
}

fn vec2_at(data: &[f32], index: usize) -> Option<Vector2<f32>> {
    let base = index.checked_mul(2)?;
    Some(Vector2::new(*data.get(base)?, *data.get(base + 1)?))
}

fn vec3_at(data: &[f32], index: usize) -> Option<Vector3<f32>> {
    let base = index.checked_mul(3)?;
    Some(Vector3::new(
        *data.get(base)?,
        *data.get(base + 1)?,
        *data.get(base + 2)?,
    ))
}

/// Loads every model in `obj_path` and merges them into one triangle soup.
///
/// Polygons are fan-triangulated from their first vertex. Vertices without a
/// texture coordinate get `(0, 0)`, vertices without a normal get `(0, 0, 1)`.
pub fn load_obj<P: AsRef<Path>>(obj_path: P) -> Result<ObjMesh, String> {
    let obj_path = obj_path.as_ref();
    info!("loading OBJ file: {:?}", obj_path);

    let base_path = obj_path.parent().unwrap_or_else(|| Path::new("."));

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, materials_result) = tobj::load_obj(obj_path, &load_options)
        .map_err(|e| format!("failed to load OBJ {:?}: {}", obj_path, e))?;

    let texture_path = match materials_result {
        Ok(materials) => materials
            .iter()
            .find_map(|mat| mat.diffuse_texture.as_ref())
            .map(|name| base_path.join(name)),
        Err(e) => {
            debug!("no usable MTL for {:?}: {}", obj_path, e);
            None
        }
    };

    let mut mesh = ObjMesh {
        texture_path,
        ..Default::default()
    };
    let mut missing_texcoords = 0;
    let mut missing_normals = 0;

    for model in &models {
        let m = &model.mesh;
        if m.indices.len() % 3 != 0 {
            return Err(format!(
                "model '{}' has {} indices after triangulation",
                model.name,
                m.indices.len()
            ));
        }
        let has_texcoords = m.texcoord_indices.len() == m.indices.len();
        let has_normals = m.normal_indices.len() == m.indices.len();

        for (corner, &index) in m.indices.iter().enumerate() {
            let position = vec3_at(&m.positions, index as usize).ok_or_else(|| {
                format!("model '{}' references missing vertex {}", model.name, index)
            })?;
            mesh.positions.push(position);

            let texcoord = if has_texcoords {
                vec2_at(&m.texcoords, m.texcoord_indices[corner] as usize)
            } else {
                None
            };
            if texcoord.is_none() {
                missing_texcoords += 1;
            }
            mesh.texcoords.push(texcoord.unwrap_or_else(Vector2::zeros));

            let normal = if has_normals {
                vec3_at(&m.normals, m.normal_indices[corner] as usize)
            } else {
                None
            };
            if normal.is_none() {
                missing_normals += 1;
            }
            mesh.normals.push(normal.unwrap_or(DEFAULT_NORMAL));
        }
    }

    if missing_texcoords > 0 {
        debug!("{} vertices without texture coordinates", missing_texcoords);
    }
    if missing_normals > 0 {
        warn!(
            "{} vertices without normals, using (0, 0, 1)",
            missing_normals
        );
    }
    info!(
        "loaded {} model(s), {} triangles",
        models.len(),
        mesh.num_triangles()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "perspective_rasterizer_obj_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.obj", name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn quad_is_split_into_a_fan() {
        let path = write_temp(
            "quad",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             vn 0 0 -1\n\
             f 1/1/1 2/2/1 3/3/1 4/4/1\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.positions.len(), 6);

        // both triangles start at the first corner
        assert_eq!(mesh.positions[0], Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.positions[3], Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.texcoords[2], Vector2::new(1.0, 1.0));
        assert!(mesh.normals.iter().all(|n| *n == Vector3::new(0.0, 0.0, -1.0)));
        assert!(mesh.texture_path.is_none());
    }

    #[test]
    fn missing_attributes_get_defaults() {
        let path = write_temp("bare", "v 0 0 1\nv 0 1 1\nv 1 0 1\nf 1 2 3\n");
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.num_triangles(), 1);
        assert!(mesh.texcoords.iter().all(|t| *t == Vector2::zeros()));
        assert!(mesh.normals.iter().all(|n| *n == DEFAULT_NORMAL));

        let object = mesh.into_scene_object(Arc::new(Texture::default())).unwrap();
        assert_eq!(object.num_triangles(), 1);
    }

    #[test]
    fn mtl_texture_is_resolved_next_to_the_obj() {
        let path = write_temp(
            "textured",
            "mtllib textured.mtl\nv 0 0 1\nv 0 1 1\nv 1 0 1\nusemtl skin\nf 1 2 3\n",
        );
        let dir = path.parent().unwrap().to_path_buf();
        std::fs::write(dir.join("textured.mtl"), "newmtl skin\nmap_Kd skin.png\n").unwrap();

        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.texture_path, Some(dir.join("skin.png")));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_obj("/nonexistent/model.obj").is_err());
    }
}
