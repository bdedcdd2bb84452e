#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;

use std::fmt;

use geom::{
    LineMesh, LinearScalarMapper, PipeGeometryGenerator, PipeMesh, Point3, clip_polyline_start_above_z,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not initialize rayon thread pool: {err}")))
}

#[derive(Debug, Serialize)]
struct SurfaceExport<'a> {
    positions: &'a [f32],
    normals: &'a [f32],
    indices: Vec<u32>,
}

impl<'a> SurfaceExport<'a> {
    fn new(mesh: &'a PipeMesh) -> Self {
        Self {
            positions: mesh.positions_flat(),
            normals: mesh.normals_flat(),
            indices: mesh.triangle_indices(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LineExport<'a> {
    positions: &'a [f32],
    indices: Vec<u32>,
}

impl<'a> LineExport<'a> {
    fn new(line: &'a LineMesh) -> Self {
        Self {
            positions: line.positions_flat(),
            indices: line.line_indices(),
        }
    }
}

/// Pipe geometry for a center line, exposed to JS.
#[wasm_bindgen]
pub struct PipeEngine {
    generator: PipeGeometryGenerator,
}

impl Default for PipeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PipeEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PipeEngine {
        PipeEngine {
            generator: PipeGeometryGenerator::new(),
        }
    }

    #[wasm_bindgen]
    pub fn set_radius(&mut self, radius: f64) -> Result<(), JsValue> {
        self.generator.set_radius(radius).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_cross_section_vertex_count(&mut self, count: u32) -> Result<(), JsValue> {
        self.generator
            .set_cross_section_vertex_count(count as usize)
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_minimum_bend_angle(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.generator.set_minimum_bend_angle(degrees).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_bend_scaling_factor(&mut self, factor: f64) -> Result<(), JsValue> {
        self.generator.set_bend_scaling_factor(factor).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_first_visible_segment_index(&mut self, index: u32) {
        self.generator.set_first_visible_segment_index(index as usize);
    }

    /// Set the center line from packed `[x0, y0, z0, x1, ...]` coordinates.
    #[wasm_bindgen]
    pub fn set_center_line(&mut self, coords: &[f64]) -> Result<(), JsValue> {
        let points = points_from_flat(coords).map_err(to_js_error)?;
        self.generator.set_center_line(&points).map_err(to_js_error)?;
        self.generator.set_first_visible_segment_index(0);
        log::debug!("center line set: {} points", points.len());
        Ok(())
    }

    /// Like [`set_center_line`](Self::set_center_line), but drops the part of
    /// the path above `max_z` first. Returns the horizontal length removed.
    #[wasm_bindgen]
    pub fn set_center_line_clipped_above_z(&mut self, coords: &[f64], max_z: f64) -> Result<f64, JsValue> {
        let points = points_from_flat(coords).map_err(to_js_error)?;
        let clipped = clip_polyline_start_above_z(&points, max_z);
        self.generator.set_center_line(&clipped.points).map_err(to_js_error)?;
        self.generator
            .set_first_visible_segment_index(clipped.first_visible_segment_index.unwrap_or(0));
        Ok(clipped.horizontal_length_to_clip_point)
    }

    /// `{ positions, normals, indices }` for the pipe surface, or `null`.
    #[wasm_bindgen]
    pub fn build_surface(&mut self) -> Result<JsValue, JsValue> {
        let mesh = self.generator.build_surface().map_err(to_js_error)?;
        let export = mesh.as_ref().map(SurfaceExport::new);
        serde_wasm_bindgen::to_value(&export).map_err(to_js_error)
    }

    /// `{ positions, indices }` line list for the unfiltered center line, or `null`.
    #[wasm_bindgen]
    pub fn build_center_line(&mut self) -> Result<JsValue, JsValue> {
        let line = self.generator.build_center_line().map_err(to_js_error)?;
        let export = line.as_ref().map(LineExport::new);
        serde_wasm_bindgen::to_value(&export).map_err(to_js_error)
    }

    /// Packed `[u, v, ...]` per surface vertex, from one value per original segment.
    #[wasm_bindgen]
    pub fn surface_texture_coordinates(&mut self, values: &[f64], min: f64, max: f64) -> Result<Vec<f32>, JsValue> {
        let coords = self
            .generator
            .compute_surface_texture_coordinates(values, &LinearScalarMapper::new(min, max))
            .map_err(to_js_error)?;
        Ok(coords.as_flattened().to_vec())
    }

    #[wasm_bindgen]
    pub fn center_line_texture_coordinates(&mut self, values: &[f64], min: f64, max: f64) -> Result<Vec<f32>, JsValue> {
        let coords = self
            .generator
            .compute_center_line_texture_coordinates(values, &LinearScalarMapper::new(min, max))
            .map_err(to_js_error)?;
        Ok(coords.as_flattened().to_vec())
    }

    /// Original segment index under a picked surface triangle.
    #[wasm_bindgen]
    pub fn segment_index_from_triangle_index(&mut self, triangle_index: u32) -> Option<u32> {
        self.generator
            .segment_index_from_triangle_index(triangle_index as usize)
            .and_then(|index| u32::try_from(index).ok())
    }

    #[wasm_bindgen]
    pub fn diagnostics(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.generator.diagnostics()).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn diagnostics_summary(&self) -> String {
        self.generator.diagnostics().summary()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FlatCoordinateError(usize);

impl fmt::Display for FlatCoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "center line needs x, y, z triples, got {} values", self.0)
    }
}

fn points_from_flat(coords: &[f64]) -> Result<Vec<Point3>, FlatCoordinateError> {
    if coords.len() % 3 != 0 {
        return Err(FlatCoordinateError(coords.len()));
    }
    Ok(coords
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
