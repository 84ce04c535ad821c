//! Pocket Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pocket_arcade::consts::MAX_FRAME_MS;
    use pocket_arcade::levels::{LEVELS_PER_GAME, level, level_title};
    use pocket_arcade::sim::Heading;
    use pocket_arcade::{
        GameHost, GameKind, HostInput, LevelParams, LevelRecords, MiniGame, Tuning,
    };

    /// Browser-side state wrapped around the host
    struct Game {
        host: GameHost,
        tuning: Tuning,
        records: Rc<RefCell<LevelRecords>>,
        last_time: f64,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        /// Logical size of the mounted game's playfield
        fn field_size(&self) -> Vec2 {
            match self.host.game() {
                MiniGame::Board(_) => Vec2::splat(self.tuning.board.board_size),
                MiniGame::Reaction(_) => Vec2::new(
                    self.tuning.arcade.field_width,
                    self.tuning.arcade.field_height,
                ),
                MiniGame::Snake(_) => Vec2::new(
                    self.tuning.arcade.grid_width as f32,
                    self.tuning.arcade.grid_height as f32,
                ),
                MiniGame::Memory(game) => Vec2::new(game.columns() as f32, game.rows() as f32),
            }
        }

        /// Map a canvas-relative CSS pixel position into game coordinates
        fn to_game(&self, x: f32, y: f32) -> Vec2 {
            let client = Vec2::new(
                self.canvas.client_width().max(1) as f32,
                self.canvas.client_height().max(1) as f32,
            );
            Vec2::new(x, y) / client * self.field_size()
        }

        fn pointer_down(&mut self, x: f32, y: f32) {
            let p = self.to_game(x, y);
            let input = match self.host.game() {
                MiniGame::Memory(game) => match game.card_at(p) {
                    Some(index) => HostInput::Select(index),
                    None => return,
                },
                _ => HostInput::PointerDown(p),
            };
            self.host.input(input);
        }

        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;
            self.host.frame(elapsed);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.host.game().score().to_string()));
            }

            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                let session = self.host.session();
                let text = match session.time_limit_secs {
                    Some(_) => {
                        let secs = session.time_remaining;
                        format!("{}:{:02}", secs / 60, secs % 60)
                    }
                    None => "--".to_string(),
                };
                el.set_text_content(Some(&text));
            }

            if let Some(el) = document.get_element_by_id("round-over") {
                let class = if self.host.session().is_over() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    /// `?game=snake_master&level=4`; missing or bad values fall back to memory level 1
    fn level_from_url(window: &web_sys::Window) -> Result<LevelParams, JsValue> {
        let search = window.location().search().unwrap_or_default();
        let query = web_sys::UrlSearchParams::new_with_str(&search).ok();
        let get = |key: &str| query.as_ref().and_then(|q| q.get(key));

        let kind = get("game")
            .and_then(|id| GameKind::from_id(&id).ok())
            .unwrap_or(GameKind::Memory);
        let number = get("level")
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(1)
            .clamp(1, LEVELS_PER_GAME);

        level(kind, number).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pocket Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let params = level_from_url(&window)?;
        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;
        let level_id = params.level_id.clone();
        if let Some(el) = document.get_element_by_id("hud-title") {
            el.set_text_content(Some(&level_title(params.kind(), params.number)));
        }

        let mut host = GameHost::start(params, tuning.clone(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let records = Rc::new(RefCell::new(LevelRecords::load()));
        {
            let records = records.clone();
            host.set_on_complete(Box::new(move |completion| {
                log::info!(
                    "{} complete: won={} score={} stars={}",
                    level_id,
                    completion.won,
                    completion.score,
                    completion.stars
                );
                let mut records = records.borrow_mut();
                records.record(&level_id, completion);
                records.save();
            }));
        }

        let game = Rc::new(RefCell::new(Game {
            host,
            tuning,
            records,
            last_time: 0.0,
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);
        Ok(())
    }

    /// Canvas-relative position of the first touch point
    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Mouse move (board aiming)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let p = g.to_game(event.offset_x() as f32, event.offset_y() as f32);
                g.host.input(HostInput::PointerMove(p));
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse down (charge, strike or flip)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .pointer_down(event.offset_x() as f32, event.offset_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse up (release a charged shot)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().host.input(HostInput::PointerUp);
            });
            canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_point(&canvas_clone, &event) {
                    game.borrow_mut().pointer_down(x, y);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_point(&canvas_clone, &event) {
                    let mut g = game.borrow_mut();
                    let p = g.to_game(x, y);
                    g.host.input(HostInput::PointerMove(p));
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().host.input(HostInput::PointerUp);
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard (snake steering, back)
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let heading = match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => Some(Heading::Up),
                    "ArrowDown" | "s" | "S" => Some(Heading::Down),
                    "ArrowLeft" | "a" | "A" => Some(Heading::Left),
                    "ArrowRight" | "d" | "D" => Some(Heading::Right),
                    "Escape" => {
                        g.host.back();
                        None
                    }
                    _ => None,
                };
                if let Some(heading) = heading {
                    event.prevent_default();
                    g.host.input(HostInput::Steer(heading));
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().host.restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("back-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.host.back();
                let stars = g.records.borrow().total_stars();
                log::info!("Back to menu ({} stars collected)", stars);
                if let Some(window) = web_sys::window() {
                    let _ = window.history().and_then(|h| h.back());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pocket Arcade (native) starting...");
    log::info!("Native mode runs headless demo rounds - serve the wasm build to play");

    let mut records = pocket_arcade::LevelRecords::load();
    for kind in pocket_arcade::GameKind::ALL {
        match demo::play(kind, 1) {
            Ok((level_id, completion)) => {
                println!(
                    "{:<18} {:<14} won={:<5} score={:<5} stars={}",
                    level_id,
                    pocket_arcade::levels::level_title(kind, 1),
                    completion.won,
                    completion.score,
                    completion.stars
                );
                records.record(&level_id, completion);
            }
            Err(e) => log::error!("{}: {}", kind.id(), e),
        }
    }
    println!("Total stars: {}", records.total_stars());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless rounds
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use pocket_arcade::consts::BOARD_TICK_MS;
    use pocket_arcade::levels::level;
    use pocket_arcade::sim::{ActorState, Completion};
    use pocket_arcade::{ConfigResult, GameHost, GameKind, HostInput, MiniGame, Tuning};

    /// Longest demo round before giving up (ten simulated minutes)
    const MAX_FRAMES: u32 = 36_000;

    pub fn play(kind: GameKind, number: u32) -> ConfigResult<(String, Completion)> {
        let params = level(kind, number)?;
        let level_id = params.level_id.clone();
        let mut host = GameHost::start(params, Tuning::default(), 0x5eed)?;

        for frame in 0..MAX_FRAMES {
            for input in scripted_input(host.game(), frame) {
                host.input(input);
            }
            if let Some(completion) = host.frame(BOARD_TICK_MS) {
                return Ok((level_id, completion));
            }
        }

        host.back();
        log::warn!("{} did not finish", level_id);
        Ok((
            level_id,
            Completion {
                score: host.game().score(),
                stars: 0,
                won: false,
            },
        ))
    }

    /// A bot that plays each game passably
    fn scripted_input(game: &MiniGame, frame: u32) -> Vec<HostInput> {
        match game {
            MiniGame::Memory(memory) => {
                // Perfect memory: flip the lowest unmatched pair
                let Some(card) = memory.cards.iter().find(|c| !c.matched && !c.face_up) else {
                    return Vec::new();
                };
                memory
                    .cards
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.pair_id == card.pair_id)
                    .map(|(i, _)| HostInput::Select(i))
                    .collect()
            }
            MiniGame::Board(board) => {
                if !board.turn.awaiting(pocket_arcade::sim::Side::Player) {
                    return Vec::new();
                }
                // Charge for a second, then let go
                match frame % 90 {
                    0 => vec![HostInput::PointerDown(Vec2::new(
                        250.0 + (frame % 7) as f32 * 15.0,
                        300.0,
                    ))],
                    60 => vec![HostInput::PointerUp],
                    _ => Vec::new(),
                }
            }
            // Straight ahead until the wall
            MiniGame::Snake(_) => Vec::new(),
            MiniGame::Reaction(reaction) => reaction
                .actors
                .iter()
                .filter(|a| a.state == ActorState::Live && !a.hazard)
                .take(1)
                .map(|a| HostInput::PointerDown(a.pos))
                .collect(),
        }
    }
}
