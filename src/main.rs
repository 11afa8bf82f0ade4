mod cli_options;

use log::{error, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use geometry::{ray_plane_intersection, Camera, Plane, Projection};
use math::{vec3, Degree, MathResult, Vec3};

use cli_options::CliOptions;

// Degrees of orbit per pixel of pointer drag.
const DRAG_SENSITIVITY: f32 = 0.25;
// World units of dolly per wheel notch.
const WHEEL_STEP: f32 = 0.5;

/// One frame of input, as a windowing layer would report it.
struct PointerInput {
    drag: (f32, f32),
    wheel: f32,
}

fn simulated_input(rng: &mut StdRng) -> PointerInput {
    PointerInput {
        drag: (rng.gen_range(-40.0..40.0), rng.gen_range(-12.0..12.0)),
        wheel: rng.gen_range(-2i32..=2) as f32,
    }
}

fn run(options: &CliOptions) -> MathResult<()> {
    let fov_y = Degree(options.fov_degrees);
    let (near, far) = (0.1, 100.0);
    let projection = if options.orthographic {
        Projection::Orthographic {
            fov_y,
            aspect: options.aspect,
            near,
            far,
        }
    } else {
        Projection::Perspective {
            fov_y,
            aspect: options.aspect,
            near,
            far,
        }
    };
    let pivot = Vec3::ZERO;
    let mut camera =
        Camera::looking_at(vec3(0.0, 4.0, 12.0), pivot, Vec3::Y)?.with_projection(projection);
    let ground_plane = Plane::new(Vec3::Y, 0.0);
    let ground = ground_plane.quad(pivot, 50.0);

    let mut rng = StdRng::seed_from_u64(0);
    let mut heading = Degree(0.0);
    for frame in 0..options.frames {
        let input = simulated_input(&mut rng);
        let yaw = Degree(-input.drag.0 * DRAG_SENSITIVITY);
        let pitch = Degree(-input.drag.1 * DRAG_SENSITIVITY);
        heading = (heading + yaw).reduce_to_one_turn();
        camera = camera.orbit(yaw, pitch, pivot).dolly(input.wheel * WHEEL_STEP);

        let upload = camera.view_projection()?.to_cols_array();
        let visible = camera.frustum()?.clip(&ground);
        info!(
            "frame {}: heading {:.1}deg, eye {}, {} visible ground vertices, area {:.2}",
            frame,
            heading.value(),
            camera.position(),
            visible.len(),
            visible.area()
        );
        info!("frame {}: view-projection (column-major) {:?}", frame, upload);

        match ray_plane_intersection(&camera.center_ray(), &ground_plane) {
            Some(hit) => info!("frame {}: view center hits ground at {}", frame, hit.point),
            None => info!("frame {}: view center misses the ground", frame),
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let options = match cli_options::parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("usage: {}", CliOptions::message());
            std::process::exit(1);
        }
    };
    if options.show_help {
        println!("usage: {}", CliOptions::message());
        return;
    }

    if let Err(e) = run(&options) {
        error!("camera setup failed: {}", e);
        std::process::exit(1);
    }
}
