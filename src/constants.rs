// src/constants.rs

/// Name of the optional binary subdirectory at the deepest level of a tool's hierarchy.
pub const BIN_DIR_NAME: &str = "bin";

/// Directory name that matches any operating system or architecture.
pub const GENERIC_DIR_NAME: &str = "Generic";

/// Default extension for environment files.
pub const ENV_FILE_EXTENSION: &str = ".env";

/// Long help describing the expected on-disk layout, shown by `toolcase activate --help`.
pub const TOOL_LAYOUT_HELP: &str = r#"Tools should be organized by:

  <tools_directory>/
    <tool_name>/
      [<version>/]
        [<operating_system: Linux | MacOS | Windows | Generic>/]
          [<architecture: x64 | x86 | ARM64 | ARM | Generic>/]
            [bin/]

Each of these examples is supported:

  Tools/
    Tool1/
    Tool2/bin/
    Tool3/1.0.0/
    Tool3/1.0.0/bin/
    Tool4/v1.0.0/
    Tool5/1.0.0/Linux/
    Tool6/1.0.0/Linux/bin/
    Tool7/1.0.0/Linux/x64/
    Tool8/1.0.0/Linux/x64/bin/
"#;
