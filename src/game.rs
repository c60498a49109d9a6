//! Core game state: the ECS world, the system schedule and per-tick driving.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use sdl2::event::EventType;
use sdl2::render::{Canvas, ScaleMode, Texture, TextureCreator};
use sdl2::rwops::RWops;
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use tracing::{debug, info, trace, warn};

use crate::asset::{self, Asset};
use crate::constants::{ui, CANVAS_SIZE};
use crate::error::{GameError, GameResult};
use crate::events::{GameEvent, StageTransition};
use crate::formatter;
use crate::platform;
use crate::systems::{
    audio_system, dirty_render_system, drag_system, error_system, hud_render_system, input_system,
    present_system, render_system, stage_system, timer_system, AudioEvent, AudioResource,
    AudioState, BackbufferResource, BackdropBlur, Bindings, BlurTargetResource, CountdownTimer,
    DragState, GameRng, GameStage, GlobalState, PhotoCatalog, PieceLift, RenderDirty, Session,
};
use crate::texture::photos::PhotoSet;
use crate::texture::ttf::TtfAtlas;

/// System set for all gameplay systems to ensure they run after input processing
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Gameplay systems that process inputs
    Input,
    /// Gameplay systems that update the game state
    Update,
    /// Gameplay systems that respond to events
    Respond,
}

/// System set for all rendering systems to ensure they run after gameplay logic
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum RenderSet {
    Prepare,
    Draw,
    Present,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Orchestrates all game systems through a centralized `World` containing
/// entities, components, and resources, while a `Schedule` defines system
/// execution order. SDL2 resources are stored as `NonSend` to respect thread
/// safety requirements while integrating with the ECS.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Initializes the complete game state: render targets, the font atlas,
    /// the photo pool, audio, the ECS event registry, resources and the
    /// system schedule.
    ///
    /// # Errors
    ///
    /// Returns `GameError` for SDL2 failures, asset loading problems or
    /// texture creation issues.
    pub fn new(
        mut canvas: Canvas<Window>,
        ttf_context: sdl2::ttf::Sdl2TtfContext,
        texture_creator: TextureCreator<WindowContext>,
        mut event_pump: EventPump,
    ) -> GameResult<Game> {
        info!("Starting game initialization");

        debug!("Disabling unnecessary SDL events");
        Self::disable_sdl_events(&mut event_pump);

        debug!("Setting up textures and fonts");
        let (backbuffer, blur_target, ttf_atlas) =
            Self::setup_textures_and_fonts(&mut canvas, &texture_creator, ttf_context)?;
        trace!("Yielding after texture setup");
        platform::yield_to_browser();

        debug!("Initializing audio subsystem");
        let audio = crate::audio::Audio::new();
        trace!("Yielding after audio init");
        platform::yield_to_browser();

        debug!("Loading photo pool");
        let photos = PhotoSet::load(&texture_creator)?;
        let catalog = PhotoCatalog::new(photos.sizes());
        trace!("Yielding after photo load");
        platform::yield_to_browser();

        debug!("Initializing ECS world and system schedule");
        let mut world = World::default();
        let mut schedule = Schedule::default();

        debug!("Setting up ECS event registry");
        Self::setup_ecs(&mut world);

        debug!("Inserting resources into ECS world");
        Self::insert_resources(
            &mut world,
            audio,
            photos,
            catalog,
            event_pump,
            canvas,
            backbuffer,
            blur_target,
            ttf_atlas,
        );

        debug!("Configuring system execution schedule");
        Self::configure_schedule(&mut schedule);

        info!("Game initialization completed successfully");
        Ok(Game { world, schedule })
    }

    fn disable_sdl_events(event_pump: &mut EventPump) {
        for event_type in [
            EventType::JoyAxisMotion,
            EventType::JoyBallMotion,
            EventType::JoyHatMotion,
            EventType::JoyButtonDown,
            EventType::JoyButtonUp,
            EventType::JoyDeviceAdded,
            EventType::JoyDeviceRemoved,
            EventType::ControllerAxisMotion,
            EventType::ControllerButtonDown,
            EventType::ControllerButtonUp,
            EventType::ControllerDeviceAdded,
            EventType::ControllerDeviceRemoved,
            EventType::ControllerDeviceRemapped,
            EventType::ControllerTouchpadDown,
            EventType::ControllerTouchpadMotion,
            EventType::ControllerTouchpadUp,
            EventType::DollarGesture,
            EventType::DollarRecord,
            EventType::MultiGesture,
            EventType::ClipboardUpdate,
            EventType::DropFile,
            EventType::DropText,
            EventType::DropBegin,
            EventType::DropComplete,
            EventType::AudioDeviceAdded,
            EventType::AudioDeviceRemoved,
            EventType::RenderTargetsReset,
            EventType::RenderDeviceReset,
            EventType::LocaleChanged,
            EventType::TextInput,
            EventType::TextEditing,
            EventType::Display,
            EventType::MouseWheel,
            EventType::AppDidEnterBackground,
            EventType::AppWillEnterForeground,
            EventType::AppWillEnterBackground,
            EventType::AppDidEnterForeground,
            EventType::AppLowMemory,
            EventType::AppTerminating,
            EventType::User,
            EventType::Last,
        ] {
            event_pump.disable_event(event_type);
        }
    }

    fn setup_textures_and_fonts(
        canvas: &mut Canvas<Window>,
        texture_creator: &TextureCreator<WindowContext>,
        ttf_context: sdl2::ttf::Sdl2TtfContext,
    ) -> GameResult<(Texture, Texture, TtfAtlas)> {
        trace!("Creating backbuffer texture");
        let mut backbuffer = texture_creator
            .create_texture_target(None, CANVAS_SIZE.x, CANVAS_SIZE.y)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        backbuffer.set_scale_mode(ScaleMode::Nearest);
        platform::yield_to_browser();

        trace!("Creating blur scratch texture");
        let blur_size = CANVAS_SIZE / ui::BLUR_FACTOR;
        let mut blur_target = texture_creator
            .create_texture_target(None, blur_size.x, blur_size.y)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        // Linear filtering on the upscale is what produces the blur.
        blur_target.set_scale_mode(ScaleMode::Linear);
        platform::yield_to_browser();

        trace!("Loading font");
        let font_data: &'static [u8] = asset::get_asset_bytes(Asset::FontSans)?.to_vec().leak();
        let font_asset = RWops::from_bytes(font_data)
            .map_err(|_| GameError::Sdl("Failed to load font".to_string()))?;
        let font = ttf_context
            .load_font_from_rwops(font_asset, ui::FONT_SIZE)
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        trace!("Creating TTF atlas");
        let mut ttf_atlas = TtfAtlas::new(texture_creator, &font)?;
        platform::yield_to_browser();

        trace!("Populating TTF atlas");
        ttf_atlas.populate_atlas(canvas, texture_creator, &font)?;

        Ok((backbuffer, blur_target, ttf_atlas))
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);
        EventRegistry::register_event::<StageTransition>(world);
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_resources(
        world: &mut World,
        audio: crate::audio::Audio,
        photos: PhotoSet,
        catalog: PhotoCatalog,
        event_pump: EventPump,
        canvas: Canvas<Window>,
        backbuffer: Texture,
        blur_target: Texture,
        ttf_atlas: TtfAtlas,
    ) {
        world.insert_resource(catalog);
        world.insert_resource(GameStage::Idle);
        world.insert_resource(CountdownTimer::default());
        world.insert_resource(Session::default());
        world.insert_resource(DragState::default());
        world.insert_resource(PieceLift::default());
        world.insert_resource(BackdropBlur::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(Bindings::default());
        world.insert_resource(AudioState::default());
        world.insert_resource(RenderDirty::default());
        world.insert_resource(GameRng(platform::rng()));

        world.insert_non_send_resource(event_pump);
        world.insert_non_send_resource::<&mut Canvas<Window>>(Box::leak(Box::new(canvas)));
        world.insert_non_send_resource(BackbufferResource(backbuffer));
        world.insert_non_send_resource(BlurTargetResource(blur_target));
        world.insert_non_send_resource(ttf_atlas);
        world.insert_non_send_resource(photos);
        world.insert_non_send_resource(AudioResource(audio));
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                input_system.in_set(GameplaySet::Input),
                (timer_system, drag_system)
                    .chain()
                    .in_set(GameplaySet::Update),
                (stage_system, audio_system, error_system)
                    .chain()
                    .in_set(GameplaySet::Respond),
                dirty_render_system.in_set(RenderSet::Prepare),
                (render_system, hud_render_system)
                    .chain()
                    .in_set(RenderSet::Draw),
                present_system.in_set(RenderSet::Present),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Update,
                    GameplaySet::Respond,
                    RenderSet::Prepare,
                    RenderSet::Draw.run_if(|dirty: Res<RenderDirty>| dirty.0),
                    RenderSet::Present,
                )
                    .chain(),
            );
    }

    /// Injects a command as if the player had issued it. Used by the
    /// browser entry points the host page calls.
    #[cfg(target_os = "emscripten")]
    pub fn send_command(&mut self, command: crate::events::GameCommand) {
        let _ = self.world.send_event(GameEvent::Command(command));
    }

    /// Runs one tick of the game. Returns whether the player asked to quit.
    pub fn tick(&mut self, dt: f32) -> bool {
        // Manual double-buffer advance; there is no bevy_app runner to do it.
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<StageTransition>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();
        self.world.resource_mut::<Events<GameError>>().update();

        let start = std::time::Instant::now();
        self.schedule.run(&mut self.world);
        let total_duration = start.elapsed();

        // Expected frame time comes from dt, with 20% headroom for normal variance.
        let frame_budget_ms = (dt * 1000.0 * 1.2) as u128;
        if total_duration.as_millis() > frame_budget_ms {
            warn!(
                total = format!("{:.3?}", total_duration),
                budget = format!("{frame_budget_ms}ms"),
                tick = formatter::get_tick_count(),
                "Frame took longer than expected"
            );
        }

        self.world.resource::<GlobalState>().exit
    }
}
