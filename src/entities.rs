//! Game entities: plain data plus rectangle geometry.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in play-field pixels.  `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// AABB overlap test.  Rectangles that merely touch along an edge or a
    /// corner count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn set_location(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

// ── Per-kind parameters ───────────────────────────────────────────────────────

/// Sideways-motion state shared by every falling body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drift {
    /// Sideways step used by the side-steer and jitter policies.
    pub horizontal_speed: i32,
    /// Speed the body was designed with; bounds the jitter factor.
    pub default_speed: i32,
    /// x coordinate of the last placement.  Decides the steering side.
    pub anchor_x: i32,
    /// Sinusoid phase, drawn once on first use and then kept.
    pub phase: Option<i32>,
}

impl Drift {
    pub fn new(default_speed: i32, anchor_x: i32) -> Self {
        Self {
            horizontal_speed: default_speed,
            default_speed,
            anchor_x,
            phase: None,
        }
    }
}

/// Enemy-ship cannon state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gun {
    pub last_fire_ms: u64,
    pub cooldown_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Ship,
    Bullet,
    EnemyBullet,
    Asteroid(Drift),
    /// Heavy asteroid that reflects player bullets instead of breaking.
    ChuckNorris(Drift),
    EnemyShip(Drift, Gun),
}

/// Whether a body is in play or showing its explosion before respawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    /// Destroyed at `since_ms`; `at` is where the explosion is drawn.
    Exploding { since_ms: u64, at: Rect },
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub rect: Rect,
    /// Vertical speed in pixels per tick.  Bullets move up, everything else down.
    pub speed: i32,
    pub lifecycle: Lifecycle,
}

impl Entity {
    pub fn new(kind: EntityKind, rect: Rect, speed: i32) -> Self {
        Self {
            kind,
            rect,
            speed,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    pub fn drift(&self) -> Option<&Drift> {
        match &self.kind {
            EntityKind::Asteroid(d) | EntityKind::ChuckNorris(d) | EntityKind::EnemyShip(d, _) => {
                Some(d)
            }
            _ => None,
        }
    }

    pub fn drift_mut(&mut self) -> Option<&mut Drift> {
        match &mut self.kind {
            EntityKind::Asteroid(d) | EntityKind::ChuckNorris(d) | EntityKind::EnemyShip(d, _) => {
                Some(d)
            }
            _ => None,
        }
    }

    pub fn gun_mut(&mut self) -> Option<&mut Gun> {
        match &mut self.kind {
            EntityKind::EnemyShip(_, gun) => Some(gun),
            _ => None,
        }
    }

    /// Move to `(x, y)`, remembering `x` as the steering anchor.
    pub fn place(&mut self, x: i32, y: i32) {
        self.rect.set_location(x, y);
        if let Some(drift) = self.drift_mut() {
            drift.anchor_x = x;
        }
    }

    /// Start the explosion: remember where it happened, then park the body at
    /// `(park_x, park_y)` outside the play field.
    pub fn explode(&mut self, now_ms: u64, park_x: i32, park_y: i32) {
        self.lifecycle = Lifecycle::Exploding {
            since_ms: now_ms,
            at: self.rect,
        };
        self.place(park_x, park_y);
    }
}

// ── Master collections ────────────────────────────────────────────────────────

/// Every entity of one run.  Owned by [`crate::compute::Game`].
#[derive(Clone, Debug)]
pub struct Entities {
    pub ship: Entity,
    pub bullets: Vec<Entity>,
    pub enemy_bullets: Vec<Entity>,
    pub asteroids: Vec<Entity>,
    pub chuck_norrises: Vec<Entity>,
    pub enemy_ships: Vec<Entity>,
}

impl Entities {
    /// Collections with only a ship, before any body is spawned.
    pub fn with_ship(ship: Entity) -> Self {
        Self {
            ship,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            asteroids: Vec::new(),
            chuck_norrises: Vec::new(),
            enemy_ships: Vec::new(),
        }
    }
}
