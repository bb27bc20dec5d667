//! Background OBJ/MTL import
//!
//! [`ModelLoad::spawn`] parses the file on a worker thread and hands the
//! result back over a oneshot channel. The frame loop calls
//! [`ModelLoad::poll`] once per frame; nothing ever blocks the event loop.

use std::path::{Path, PathBuf};

use futures::channel::oneshot;

use crate::{
    error::{Result, SandboxError},
    gfx::scene::Mesh,
};

/// Parsed model data, ready to be placed in the scene
pub struct LoadedModel {
    pub name: String,
    pub meshes: Vec<Mesh>,
    /// Diffuse color of the first model's material, when an MTL file provides one
    pub color: Option<[f32; 3]>,
}

impl LoadedModel {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}

/// Handle to an in-flight model import
pub struct ModelLoad {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<LoadedModel>>,
}

impl ModelLoad {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();

        let worker_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("model-loader".to_string())
            .spawn(move || {
                let result = load_model(&worker_path);
                // The receiver may be gone if the app already exited
                let _ = sender.send(result);
            });

        // A failed spawn drops the sender; `poll` then reports the disconnect
        if let Err(err) = spawned {
            log::error!("Could not start the model loader thread: {err}");
        }

        log::info!("Loading model {}", path.display());
        Self { path, receiver }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` while the import is still running
    pub fn poll(&mut self) -> Option<Result<LoadedModel>> {
        match self.receiver.try_recv() {
            Ok(None) => None,
            Ok(Some(result)) => Some(result),
            Err(oneshot::Canceled) => Some(Err(SandboxError::LoaderDisconnected {
                path: self.path.clone(),
            })),
        }
    }
}

/// Parses an OBJ file (and its MTL companion, if any) into meshes
pub fn load_model(path: &Path) -> Result<LoadedModel> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| SandboxError::ModelLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No usable MTL for {} ({err}), using default material", path.display());
        Vec::new()
    });

    let meshes: Vec<Mesh> = models
        .iter()
        .map(|model| &model.mesh)
        .filter(|mesh| !mesh.indices.is_empty())
        .map(|mesh| {
            let normals = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals.clone()
            } else {
                Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
            };
            Mesh::new(mesh.positions.clone(), normals, mesh.indices.clone())
        })
        .collect();

    if meshes.is_empty() {
        return Err(SandboxError::EmptyModel {
            path: path.to_path_buf(),
        });
    }

    let color = models
        .first()
        .and_then(|model| model.mesh.material_id)
        .and_then(|id| materials.get(id))
        .and_then(|material| material.diffuse);

    let name = models
        .first()
        .map(|model| model.name.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "model".to_string());

    let model = LoadedModel {
        name,
        meshes,
        color,
    };
    log::info!(
        "Loaded {} ({} meshes, {} triangles)",
        path.display(),
        model.meshes.len(),
        model.triangle_count()
    );
    Ok(model)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Writes a one-quad OBJ (two triangles) into the temp directory
    pub(crate) fn write_quad_obj(file_name: &str, with_mtl: bool) -> PathBuf {
        let dir = std::env::temp_dir().join("sandbox3d-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);

        let mut obj = String::new();
        if with_mtl {
            let mtl_name = format!("{file_name}.mtl");
            std::fs::write(dir.join(&mtl_name), "newmtl red\nKd 1.0 0.0 0.0\n").unwrap();
            obj.push_str(&format!("mtllib {mtl_name}\n"));
        }
        obj.push_str("o quad\nv -1 0 -1\nv 1 0 -1\nv 1 0 1\nv -1 0 1\n");
        if with_mtl {
            obj.push_str("usemtl red\n");
        }
        obj.push_str("f 1 2 3 4\n");
        std::fs::write(&path, obj).unwrap();
        path
    }

    #[test]
    fn test_load_quad_with_material() {
        let path = write_quad_obj("quad_with_mtl.obj", true);
        let model = load_model(&path).unwrap();
        assert_eq!(model.name, "quad");
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(model.color, Some([1.0, 0.0, 0.0]));
        // Normals were computed since the file has none
        let normal = model.meshes[0].vertices()[0].normal;
        assert!((normal[1].abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_file_is_typed_error() {
        let path = std::env::temp_dir().join("sandbox3d-tests/does-not-exist.obj");
        let err = load_model(&path).err().unwrap();
        assert!(matches!(err, SandboxError::ModelLoad { .. }));
    }

    #[test]
    fn test_model_without_faces_is_empty() {
        let dir = std::env::temp_dir().join("sandbox3d-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("points_only.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\n").unwrap();
        assert!(matches!(
            load_model(&path),
            Err(SandboxError::EmptyModel { .. })
        ));
    }

    fn poll_until_done(load: &mut ModelLoad) -> Result<LoadedModel> {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        loop {
            if let Some(result) = load.poll() {
                return result;
            }
            assert!(std::time::Instant::now() < deadline, "model load timed out");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn test_spawned_load_reports_back() {
        let path = write_quad_obj("quad_spawned.obj", false);
        let mut load = ModelLoad::spawn(&path);
        assert_eq!(load.path(), path.as_path());
        let model = poll_until_done(&mut load).unwrap();
        assert_eq!(model.color, None);
        assert_eq!(model.meshes.len(), 1);
    }

    #[test]
    fn test_dropped_worker_reports_disconnect() {
        let (sender, receiver) = oneshot::channel::<Result<LoadedModel>>();
        let mut load = ModelLoad {
            path: PathBuf::from("lost.obj"),
            receiver,
        };
        assert!(load.poll().is_none());

        drop(sender);
        match load.poll() {
            Some(Err(SandboxError::LoaderDisconnected { path })) => {
                assert_eq!(path, PathBuf::from("lost.obj"));
            }
            other => panic!("unexpected poll result: {:?}", other.map(|r| r.is_ok())),
        }
    }
}
