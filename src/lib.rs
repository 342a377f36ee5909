use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, HtmlCanvasElement};

use rand::SeedableRng;
use rand::rngs::SmallRng;

pub mod config;
pub mod formation;
pub mod math;
pub mod render;
pub mod scene;

use config::SceneConfig;
use formation::{AnimationClock, Formation, FormationProgress};
use render::RenderPipeline;
use scene::ornaments::bauble_geometry;
use scene::{OrnamentSet, ParticleField, Ribbon, Topper};

const BAUBLE_RINGS: usize = 10;
const BAUBLE_SECTORS: usize = 14;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct OrnamentTree {
    pipeline: RenderPipeline,
    particles: ParticleField,
    ribbons: Vec<Ribbon>,
    ornaments: OrnamentSet,
    topper: Topper,
    progress: FormationProgress,
    clock: AnimationClock,
    width: i32,
    height: i32,
}

#[wasm_bindgen]
impl OrnamentTree {
    /// Create a new engine instance with the default scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<OrnamentTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let mut pipeline = RenderPipeline::new(gl, width, height)
            .map_err(|e| JsValue::from_str(&e))?;

        let progress = FormationProgress::new(Formation::Scattered);
        let clock = AnimationClock::new();

        let (particles, ribbons, ornaments, topper) = build_scene(
            &mut pipeline,
            &SceneConfig::default(),
            progress.current(),
            clock.elapsed(),
        )
        .map_err(|e| JsValue::from_str(&e))?;

        Ok(Self {
            pipeline,
            particles,
            ribbons,
            ornaments,
            topper,
            progress,
            clock,
            width,
            height,
        })
    }

    /// Replace the scene with one described by a YAML config string
    #[wasm_bindgen]
    pub fn load_config(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_yaml(yaml)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let (particles, ribbons, ornaments, topper) = build_scene(
            &mut self.pipeline,
            &config,
            self.progress.current(),
            self.clock.elapsed(),
        )
        .map_err(|e| JsValue::from_str(&e))?;

        self.particles = particles;
        self.ribbons = ribbons;
        self.ornaments = ornaments;
        self.topper = topper;

        Ok(())
    }

    /// Advance the animation by `dt` seconds and render a frame
    #[wasm_bindgen]
    pub fn frame(&mut self, dt: f32) {
        self.clock.advance(dt);
        self.progress.advance(dt.max(0.0));

        let progress = self.progress.current();
        let time = self.clock.elapsed();

        self.particles.update(progress, time);
        self.pipeline.update_particles(self.particles.data());

        for (batch, ribbon) in self.ribbons.iter_mut().enumerate() {
            ribbon.update(progress, time);
            self.pipeline.update_ribbon(batch, ribbon.vertex_data());
        }

        self.ornaments.update(progress, time);
        self.pipeline.update_ornaments(self.ornaments.transform_data());

        self.pipeline.update_topper(&self.topper.transform(progress, time));

        self.pipeline.render(time);
    }

    /// Switch target formation by name: "scattered" or "tree"
    #[wasm_bindgen]
    pub fn set_formation(&mut self, name: &str) -> Result<(), JsValue> {
        let formation = Formation::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown formation: {}", name)))?;
        self.progress.set_formation(formation);
        Ok(())
    }

    /// Flip between the two formations
    #[wasm_bindgen]
    pub fn toggle_formation(&mut self) {
        self.progress.toggle();
    }

    /// Name of the current target formation
    #[wasm_bindgen]
    pub fn formation(&self) -> String {
        self.progress.formation().name().to_string()
    }

    /// Animation progress toward the tree shape (0.0 to 1.0)
    #[wasm_bindgen]
    pub fn progress(&self) -> f32 {
        self.progress.current()
    }

    /// Whether the animation has settled on its target
    #[wasm_bindgen]
    pub fn is_settled(&self) -> bool {
        self.progress.is_settled()
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.pipeline.resize(width, height);
    }
}

/// Generate all scene elements from a config and upload their initial
/// buffers. Element generation is deterministic for a given seed.
fn build_scene(
    pipeline: &mut RenderPipeline,
    config: &SceneConfig,
    progress: f32,
    time: f32,
) -> Result<(ParticleField, Vec<Ribbon>, OrnamentSet, Topper), String> {
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let mut particles = ParticleField::new(
        &config.particles,
        &config.cone,
        config.scatter_radius,
        &mut rng,
    );
    let mut ribbons: Vec<Ribbon> = config
        .ribbons
        .iter()
        .map(|ribbon| Ribbon::new(ribbon, &config.cone, &mut rng))
        .collect();
    let mut ornaments = OrnamentSet::new(
        &config.ornaments,
        &config.cone,
        config.scatter_radius,
        &mut rng,
    );
    let topper = Topper::new(&config.topper, &config.cone, &mut rng);

    // Fill buffers for the state the animation is currently in
    particles.update(progress, time);
    for ribbon in &mut ribbons {
        ribbon.update(progress, time);
    }
    ornaments.update(progress, time);

    // One atomic upload; a failure leaves the previous scene installed
    let ribbon_buffers: Vec<(&[f32], &[u32])> = ribbons
        .iter()
        .map(|ribbon| (ribbon.vertex_data(), ribbon.index_data()))
        .collect();
    let (geometry, indices) = bauble_geometry(BAUBLE_RINGS, BAUBLE_SECTORS);
    pipeline.upload_scene(
        &ribbon_buffers,
        &geometry,
        &indices,
        ornaments.transform_data(),
        &topper.transform(progress, time),
        particles.data(),
    )?;

    pipeline.ribbon_color = config.ribbon_color;
    pipeline.ornament_color = config.ornaments.color;
    pipeline.topper_color = topper.color();

    Ok((particles, ribbons, ornaments, topper))
}
