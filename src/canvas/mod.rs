pub mod headless;
pub mod renderer;
pub mod scene;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use headless::HeadlessScene;
pub use renderer::Renderer;
pub use scene::{SceneError, SceneGraph};
pub use shapes::CurvePath;
