use super::catalog::Ensure;
use super::context::ModelContext;
use super::error::EngineError;
use super::plan::BuildPlan;
use super::result::{BuildResult, Stage};
use crate::backend::ModelBackend;
use crate::core::fascicle::{FascicleKind, FascicleSource};
use crate::core::ids::{Checkpoint, namespace};
use crate::core::template::{MasterConfig, TemplateStore};
use nalgebra::Point3;
use tracing::{debug, error, info, warn};

const FASCICLES_TARGET: &str = "fascicles";
const CURRENTS_TARGET: &str = "currents";
const CURRENT_PROPERTY: &str = "Qjp";
const POTENTIAL_EXPRESSION: &str = "V";

const TEMPLATE_STAGES: [Stage; 4] = [
    Stage::Parameters,
    Stage::Primitives,
    Stage::Materials,
    Stage::Instances,
];

/// Drives template and fascicle builds against one model context.
///
/// Every operation returns `Ok` with a failed [`BuildResult`] for recoverable
/// failures (missing templates, unsupported types, backend refusals) and
/// `Err` only when a naming invariant is broken. Nothing is rolled back:
/// identifiers minted before a failure stay retired and are listed in the
/// result.
pub struct BuildOrchestrator<'a, B: ModelBackend, S: TemplateStore + ?Sized> {
    ctx: &'a mut ModelContext<B>,
    store: &'a S,
}

impl<'a, B: ModelBackend, S: TemplateStore + ?Sized> BuildOrchestrator<'a, B, S> {
    pub fn new(ctx: &'a mut ModelContext<B>, store: &'a S) -> Self {
        Self { ctx, store }
    }

    /// Parses `name` into the plan a build would follow.
    pub fn plan(&self, name: &str) -> Result<BuildPlan, EngineError> {
        let data = self.store.load_template(name)?;
        Ok(BuildPlan::from_template(name, data))
    }

    /// Registers the template's parameter group, then ensures every part
    /// primitive its instances reference.
    pub fn add_part_primitives(&mut self, name: &str) -> Result<BuildResult, EngineError> {
        self.run_template(name, &[Stage::Parameters, Stage::Primitives])
    }

    /// Ensures every material referenced anywhere in the template.
    pub fn add_material_definitions(&mut self, name: &str) -> Result<BuildResult, EngineError> {
        self.run_template(name, &[Stage::Materials])
    }

    /// Creates one part instance per template entry, in template order.
    pub fn add_part_instances(&mut self, name: &str) -> Result<BuildResult, EngineError> {
        self.run_template(name, &[Stage::Instances])
    }

    /// Runs parameters, primitives, materials and instances for one
    /// template, stopping at the first failing stage.
    pub fn build_template(&mut self, name: &str) -> Result<BuildResult, EngineError> {
        self.run_template(name, &TEMPLATE_STAGES)
    }

    fn run_template(&mut self, name: &str, stages: &[Stage]) -> Result<BuildResult, EngineError> {
        let checkpoint = self.ctx.ids().checkpoint();
        let outcome = match self.plan(name) {
            Ok(plan) => self.try_stages(&plan, stages),
            Err(e) => Err((Stage::Load, e)),
        };
        let result = self.settle(name, checkpoint, outcome)?;
        if result.is_success() {
            info!(
                "Template '{}' processed ({} identifier(s) issued).",
                name,
                result.committed.len()
            );
        }
        Ok(result)
    }

    fn try_stages(&mut self, plan: &BuildPlan, stages: &[Stage]) -> Result<(), (Stage, EngineError)> {
        for &stage in stages {
            let outcome = match stage {
                Stage::Parameters => self.register_parameters(plan),
                Stage::Primitives => self.ensure_primitives(plan),
                Stage::Materials => self.ensure_materials(plan),
                Stage::Instances => self.create_instances(plan),
                Stage::Load | Stage::Fascicles | Stage::Currents => Ok(()),
            };
            outcome.map_err(|e| (stage, e))?;
        }
        Ok(())
    }

    fn register_parameters(&mut self, plan: &BuildPlan) -> Result<(), EngineError> {
        let group = self
            .ctx
            .ids_mut()
            .next_named(namespace::PARAMETERS, &plan.template)?;
        let backend = self.ctx.backend_mut();
        backend.create_param_group(&group)?;
        backend.label_param_group(&group, &plan.group_label)?;
        for param in &plan.params {
            backend.set_param(&group, &param.name, &param.expression, &param.description)?;
        }
        debug!(
            "Registered {} parameter(s) in '{}' ({}).",
            plan.params.len(),
            group,
            plan.group_label
        );
        Ok(())
    }

    fn ensure_primitives(&mut self, plan: &BuildPlan) -> Result<(), EngineError> {
        let mut catalog = self.ctx.catalog();
        for type_name in &plan.primitive_types {
            match catalog.ensure_primitive(type_name) {
                Ensure::AlreadyExists(_) => {
                    debug!("Primitive '{}' already exists; reusing it.", type_name)
                }
                Ensure::Created(_) => {}
                Ensure::Failed(e) => {
                    error!(
                        "Primitive '{}' (namespace '{}') failed in template '{}': {}",
                        type_name,
                        namespace::PART,
                        plan.template,
                        e
                    );
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    fn ensure_materials(&mut self, plan: &BuildPlan) -> Result<(), EngineError> {
        if plan.material_types.is_empty() {
            return Ok(());
        }
        let master = self.load_master()?;
        let mut catalog = self.ctx.catalog();
        for type_name in &plan.material_types {
            match catalog.ensure_material(type_name, &master) {
                Ensure::AlreadyExists(id) => {
                    debug!("Material '{}' already defined as '{}'.", type_name, id)
                }
                Ensure::Created(_) => {}
                Ensure::Failed(e) => {
                    error!(
                        "Material '{}' (namespace '{}') failed in template '{}': {}",
                        type_name,
                        namespace::MATERIAL,
                        plan.template,
                        e
                    );
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    fn create_instances(&mut self, plan: &BuildPlan) -> Result<(), EngineError> {
        for instance in &plan.instances {
            let id = self
                .ctx
                .ids_mut()
                .next_named(namespace::PART_INSTANCE, &instance.label)?;
            let created = self.ctx.catalog().create_instance(&id, instance);
            match created {
                Ok(Some(source)) => self.ctx.register_current_source(&instance.label, source),
                Ok(None) => {}
                Err(e) => {
                    error!(
                        "Instance '{}' ('{}' of type '{}') failed in template '{}': {}",
                        instance.label, id, instance.type_name, plan.template, e
                    );
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// Builds one fascicle instance per listed geometry.
    ///
    /// Both fascicle primitives are ensured first. Every fascicle is then
    /// checked for at least one inner and one outer contour before any
    /// instance is created, so an incomplete fascicle leaves the model
    /// without partial fascicle geometry.
    pub fn add_fascicles<F: FascicleSource + ?Sized>(
        &mut self,
        source: &F,
    ) -> Result<BuildResult, EngineError> {
        let checkpoint = self.ctx.ids().checkpoint();
        let outcome = self.try_fascicles(source);
        let result = self.settle(FASCICLES_TARGET, checkpoint, outcome)?;
        if result.is_success() {
            info!(
                "Fascicles built ({} identifier(s) issued).",
                result.committed.len()
            );
        }
        Ok(result)
    }

    fn try_fascicles<F: FascicleSource + ?Sized>(
        &mut self,
        source: &F,
    ) -> Result<(), (Stage, EngineError)> {
        {
            let mut catalog = self.ctx.catalog();
            for kind in FascicleKind::ALL {
                if let Ensure::Failed(e) = catalog.ensure_primitive(kind.primitive_name()) {
                    return Err((Stage::Primitives, e.into()));
                }
            }
        }

        let fail = |e: EngineError| (Stage::Fascicles, e);
        let geometries = source
            .list_fascicle_geometry()
            .map_err(|e| fail(e.into()))?;
        let kinds = geometries
            .iter()
            .map(|g| g.kind())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| fail(e.into()))?;

        for (i, (geometry, kind)) in geometries.iter().zip(kinds).enumerate() {
            let label = format!("fascicle{i}");
            self.ctx
                .backend_mut()
                .set_global_param(&label, "NaN", &geometry.label)
                .map_err(|e| fail(e.into()))?;
            let id = self.ctx.ids_mut().next(namespace::PART_INSTANCE);
            self.ctx
                .catalog()
                .create_fascicle_instance(&id, &label, kind, geometry)
                .map_err(|e| fail(e.into()))?;
            debug!(
                "Fascicle '{}' ({}) built as '{}' from {} inner(s).",
                label,
                geometry.label,
                kind.primitive_name(),
                geometry.inners.len()
            );
        }
        Ok(())
    }

    /// Builds the geometry sequence up to and including `tag`.
    pub fn finalize_geometry(&mut self, tag: &str) -> Result<(), EngineError> {
        self.ctx.backend_mut().run_geometry(tag)?;
        info!("Geometry built through '{}'.", tag);
        Ok(())
    }

    /// Applies `amplitude` as the current of every registered point current
    /// source.
    pub fn loop_currents(&mut self, amplitude: f64) -> Result<BuildResult, EngineError> {
        let checkpoint = self.ctx.ids().checkpoint();
        let sources = self.ctx.current_sources().to_vec();
        let mut outcome = Ok(());
        for (label, source) in &sources {
            if let Err(e) =
                self.ctx
                    .backend_mut()
                    .set_feature_property(source, CURRENT_PROPERTY, amplitude)
            {
                error!("Setting current on '{}' ({}) failed: {}", source, label, e);
                outcome = Err((Stage::Currents, EngineError::from(e)));
                break;
            }
        }
        if outcome.is_ok() {
            info!(
                "Applied {} A to {} current source(s).",
                amplitude,
                sources.len()
            );
        }
        self.settle(CURRENTS_TARGET, checkpoint, outcome)
    }

    /// Evaluates the electric potential at each point.
    ///
    /// Only meaningful once the backend has solved the model. The CLI never
    /// calls this; pair it with [`crate::core::io::coords`] when driving a
    /// solving backend from code.
    pub fn extract_potentials(&mut self, points: &[Point3<f64>]) -> Result<Vec<f64>, EngineError> {
        let id = self.ctx.ids_mut().next(namespace::INTERPOLATION);
        let values = self
            .ctx
            .backend_mut()
            .interpolate(&id, POTENTIAL_EXPRESSION, points)?;
        debug!("Interpolated '{}' at {} point(s) as '{}'.", POTENTIAL_EXPRESSION, points.len(), id);
        Ok(values)
    }

    fn load_master(&self) -> Result<MasterConfig, EngineError> {
        Ok(self.store.load_master()?)
    }

    fn settle(
        &self,
        target: &str,
        checkpoint: Checkpoint,
        outcome: Result<(), (Stage, EngineError)>,
    ) -> Result<BuildResult, EngineError> {
        let committed = self.ctx.ids().issued_since(checkpoint).to_vec();
        match outcome {
            Ok(()) => Ok(BuildResult::succeeded(target, committed)),
            Err((_, error)) if error.is_invariant_violation() => Err(error),
            Err((stage, error)) => {
                warn!(
                    "'{}' stopped at {} stage; {} identifier(s) stay retired.",
                    target,
                    stage,
                    committed.len()
                );
                Ok(BuildResult::failed(target, stage, error, committed))
            }
        }
    }
}
