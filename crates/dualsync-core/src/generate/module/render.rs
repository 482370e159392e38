//! Named module templates and `{{placeholder}}` substitution

use super::{BackendKind, ModuleName};

/// One generated file: its path under the module directory and its template
#[derive(Debug, Clone, Copy)]
pub struct Artifact {
    pub path: &'static str,
    pub template: &'static str,
}

const SHARED_STORE: &str = include_str!("templates/shared/store.ts.tmpl");

const NEST: &[Artifact] = &[
    Artifact {
        path: "{{name}}.controller.ts",
        template: include_str!("templates/nest/controller.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.service.ts",
        template: include_str!("templates/nest/service.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.module.ts",
        template: include_str!("templates/nest/module.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.store.ts",
        template: include_str!("templates/nest/store.ts.tmpl"),
    },
    Artifact {
        path: "dto/create-{{name}}.dto.ts",
        template: include_str!("templates/nest/create-dto.ts.tmpl"),
    },
    Artifact {
        path: "dto/update-{{name}}.dto.ts",
        template: include_str!("templates/nest/update-dto.ts.tmpl"),
    },
];

const EXPRESS: &[Artifact] = &[
    Artifact {
        path: "{{name}}.controller.ts",
        template: include_str!("templates/express/controller.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.routes.ts",
        template: include_str!("templates/express/routes.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.store.ts",
        template: SHARED_STORE,
    },
];

const HONO: &[Artifact] = &[
    Artifact {
        path: "{{name}}.controller.ts",
        template: include_str!("templates/hono/controller.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.routes.ts",
        template: include_str!("templates/hono/routes.ts.tmpl"),
    },
    Artifact {
        path: "{{name}}.store.ts",
        template: SHARED_STORE,
    },
];

pub fn artifacts(kind: BackendKind) -> &'static [Artifact] {
    match kind {
        BackendKind::Nest => NEST,
        BackendKind::Express => EXPRESS,
        BackendKind::Hono => HONO,
    }
}

/// Replace every `{{key}}` with its value
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut output = template.to_string();
    for (key, value) in vars {
        output = output.replace(&format!("{{{{{}}}}}", key), value);
    }
    output
}

/// Render with the module's `name` and `Name` forms
pub fn render_for(template: &str, name: &ModuleName) -> String {
    let capitalized = name.capitalized();
    render(template, &[("name", name.as_str()), ("Name", &capitalized)])
}

/// Lines telling the operator how to mount the module in the application
pub fn wiring_instructions(kind: BackendKind, name: &ModuleName) -> Vec<String> {
    let lines: &[&str] = match kind {
        BackendKind::Nest => &[
            "import { {{Name}}Module } from './{{name}}/{{name}}.module';",
            "@Module({ imports: [..., {{Name}}Module] })",
        ],
        BackendKind::Express => &[
            "import {{name}}Routes from './{{name}}/{{name}}.routes';",
            "app.use('/{{name}}', {{name}}Routes);",
        ],
        BackendKind::Hono => &[
            "import {{name}}Routes from './{{name}}/{{name}}.routes';",
            "app.route('/{{name}}', {{name}}Routes);",
        ],
    };
    lines.iter().map(|line| render_for(line, name)).collect()
}
