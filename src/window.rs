use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::TrailConfig;
use crate::driver::Driver;
use crate::error::TrailError;
use crate::gpu::Presenter;

pub struct App {
    config: TrailConfig,
    window: Option<Arc<Window>>,
    driver: Option<Driver>,
    presenter: Option<Presenter>,
    error: Option<TrailError>,
}

impl App {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config,
            window: None,
            driver: None,
            presenter: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), TrailError> {
        let [width, height] = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title("Cursor Trails")
            .with_transparent(self.config.background[3] < 1.0)
            .with_inner_size(PhysicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        let driver = Driver::new(&self.config, (size.width, size.height))?;
        let presenter = pollster::block_on(Presenter::new(
            window.clone(),
            self.config.host_surface,
            self.config.background,
            self.config.opacity,
        ))?;

        window.request_redraw();
        self.window = Some(window);
        self.driver = Some(driver);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(driver), Some(presenter)) = (&mut self.driver, &mut self.presenter) else {
            return;
        };

        let frame = driver.frame();
        match presenter.present(frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                presenter.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {:?}", e),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(driver) = &mut self.driver {
            driver.handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Open a window and run the configured effect until it is closed.
pub fn run(config: TrailConfig) -> Result<(), TrailError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    // Drop GPU resources before the window
    app.presenter = None;
    app.driver = None;
    app.window = None;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
