use crate::{
    config::Config,
    registry::{PrimitiveHandle, Registry},
    report::ProcessReport,
    spawn::{InstancePool, MeshInstantiator, Spawner},
    walk::SceneWalker,
    Error,
};

/// Per-host state: the spawner, the factory it resolved at creation, and the instance pool.
///
/// Create one when the host initializes; call [Context::finalize] when it shuts down.
#[derive(Debug)]
pub struct Context<S: Spawner> {
    config: Config,
    spawner: S,
    factory: S::Factory,
    pool: InstancePool<S::Factory, S::Object>,
    /// Reused across position decodes.
    scratch: Vec<f32>,
}

impl<S: Spawner> Context<S> {
    pub fn new(config: Config, mut spawner: S) -> Result<Self, Error> {
        let factory = match spawner.resolve_factory(&config.collection, &config.factory) {
            Ok(f) => f,
            Err(error) => {
                tracing::error!(
                    collection = config.collection.as_str(),
                    factory = config.factory.as_str(),
                    %error,
                    "could not resolve mesh factory"
                );
                return Err(error.into());
            }
        };
        tracing::debug!(?factory, capacity = config.capacity, "initialized context");
        Ok(Self {
            pool: InstancePool::new(config.capacity),
            config,
            spawner,
            factory,
            scratch: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn factory(&self) -> &S::Factory {
        &self.factory
    }

    #[inline]
    pub fn pool(&self) -> &InstancePool<S::Factory, S::Object> {
        &self.pool
    }

    #[inline]
    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Walk the scenes of the named document, spawning an instance for every mesh node.
    ///
    /// Fails only if `identifier` isn't loaded; everything skipped along the way is listed in the
    /// returned report.
    #[tracing::instrument(skip(self, registry))]
    pub fn process(
        &mut self,
        registry: &mut Registry,
        identifier: &str,
    ) -> Result<ProcessReport, Error> {
        let entry = match registry.id(identifier).and_then(|id| registry.entry_mut(id)) {
            Ok(e) => e,
            Err(error) => {
                tracing::error!(%error, "cannot process document");
                return Err(error);
            }
        };
        let doc = &entry.document;
        let scenes = self.config.scenes.scenes(doc);
        let mut report = ProcessReport::new(identifier);
        report.scenes.clone_from(&scenes);

        let mut instantiator = MeshInstantiator {
            spawner: &mut self.spawner,
            factory: &self.factory,
            pool: &mut self.pool,
            layout: self.config.layout,
            scratch: &mut self.scratch,
            report: &mut report,
        };
        SceneWalker::new(doc, &mut entry.names).walk_scenes(&scenes, &mut instantiator);

        tracing::info!(
            nodes = report.nodes_visited,
            instances = report.instances_spawned,
            geometry = report.geometry_built,
            skipped = report.skipped.len(),
            pool = self.pool.len(),
            "processed document"
        );
        Ok(report)
    }

    /// Decode a primitive's indices using the configured [IndexBase](crate::IndexBase).
    pub fn read_indices(
        &self,
        registry: &Registry,
        primitive: PrimitiveHandle,
    ) -> Result<Option<Vec<u32>>, Error> {
        registry.primitive_indices(primitive, self.config.index_base)
    }

    /// Release every spawned instance through the spawner, returning it.
    pub fn finalize(mut self) -> S {
        let instances: Vec<_> = self.pool.drain().collect();
        tracing::debug!(count = instances.len(), "releasing instances");
        for instance in instances {
            self.spawner.release(&instance.factory, instance.object);
        }
        self.spawner
    }
}
