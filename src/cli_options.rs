use std::collections::HashMap;

pub struct CliOptions {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub frames: usize,
    pub orthographic: bool,
    pub show_help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            frames: 8,
            orthographic: false,
            show_help: false,
        }
    }
}

impl CliOptions {
    pub fn message() -> &'static str {
        r#"
        --fov <degrees>       vertical field of view (default 60)
        --aspect <ratio>      width / height (default 1.78)
        --frames <n>          number of simulated input frames (default 8)
        --orthographic        use an orthographic projection
        --help
        "#
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}", key))?;
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid value {} for {}", value, key))
}

pub fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut pairs: HashMap<String, Option<String>> = HashMap::new();
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    while let Some(key) = args.pop() {
        if !key.starts_with("--") {
            return Err(format!("Unrecognized key {}", key));
        }
        match args.last() {
            None => {
                pairs.insert(key, None);
            }
            Some(value) => {
                if value.starts_with("--") {
                    pairs.insert(key, None);
                } else {
                    let value = args.pop();
                    pairs.insert(key, value);
                }
            }
        }
    }
    let mut options = CliOptions::default();
    for (k, v) in pairs.into_iter() {
        match k.as_str() {
            "--fov" => options.fov_degrees = parse_value(&k, v)?,
            "--aspect" => options.aspect = parse_value(&k, v)?,
            "--frames" => options.frames = parse_value(&k, v)?,
            "--orthographic" => options.orthographic = true,
            "--help" => options.show_help = true,
            _ => return Err(format!("Unrecognized key {}", k)),
        }
    }
    if !(options.fov_degrees > 0.0 && options.fov_degrees < 180.0) {
        return Err(format!("Field of view {} out of (0, 180)", options.fov_degrees));
    }
    if !(options.aspect > 0.0 && options.aspect.is_finite()) {
        return Err(format!("Aspect ratio {} must be positive", options.aspect));
    }
    Ok(options)
}
