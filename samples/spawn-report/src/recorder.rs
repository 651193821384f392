use scenery::{spawn::SpawnError, GeometryBuffer, Spawner, Transform};

/// A geometry buffer handed to a spawned object.
#[derive(Debug, Clone)]
pub struct GeometryRecord {
    pub mesh: String,
    pub primitive: usize,
    pub vertices: usize,
    /// Axis-aligned bounds of the positions.
    pub bounds: Option<([f32; 3], [f32; 3])>,
}

#[derive(Debug, Clone)]
pub struct SpawnRecord {
    pub id: u32,
    pub name: String,
    pub transform: Transform,
    pub geometry: Vec<GeometryRecord>,
}

/// A [Spawner] that creates nothing and remembers everything.
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    pub records: Vec<SpawnRecord>,
    pub released: usize,
}

fn bounds(geometry: &GeometryBuffer) -> Option<([f32; 3], [f32; 3])> {
    geometry.positions().fold(None, |acc, p| {
        let (mut min, mut max) = acc.unwrap_or((p, p));
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
        Some((min, max))
    })
}

impl Spawner for RecordingSpawner {
    type Factory = String;
    type Object = u32;

    fn resolve_factory(&mut self, collection: &str, factory: &str) -> Result<String, SpawnError> {
        if !factory.starts_with('#') {
            return Err(SpawnError::FactoryNotFound(factory.to_owned()));
        }
        Ok(format!("{collection}{factory}"))
    }

    fn spawn(
        &mut self,
        factory: &String,
        transform: &Transform,
        name: &str,
    ) -> Result<u32, SpawnError> {
        let id = u32::try_from(self.records.len())
            .map_err(|_| SpawnError::Host("object ids exhausted".to_owned()))?;
        tracing::trace!(factory = factory.as_str(), id, name, "spawn");
        self.records.push(SpawnRecord {
            id,
            name: name.to_owned(),
            transform: *transform,
            geometry: Vec::new(),
        });
        Ok(id)
    }

    fn attach_geometry(
        &mut self,
        object: &u32,
        mesh: &str,
        primitive: usize,
        geometry: GeometryBuffer,
    ) -> Result<(), SpawnError> {
        let record = self
            .records
            .get_mut(*object as usize)
            .ok_or_else(|| SpawnError::Host(format!("unknown object {object}")))?;
        record.geometry.push(GeometryRecord {
            mesh: mesh.to_owned(),
            primitive,
            vertices: geometry.vertex_count(),
            bounds: bounds(&geometry),
        });
        Ok(())
    }

    fn release(&mut self, _: &String, object: u32) {
        tracing::trace!(object, "release");
        self.released += 1;
    }
}
