//! Add-on descriptors, the single source for both prompts and installation

use crate::stack::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddonDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub packages: &'static [&'static str],
    pub dev_packages: &'static [&'static str],
    /// Framework ids the add-on is offered for; empty means every framework
    pub frameworks: &'static [&'static str],
}

impl AddonDescriptor {
    pub fn offered_for(&self, framework: &str) -> bool {
        self.frameworks.is_empty() || self.frameworks.contains(&framework)
    }
}

const REACT: &[&str] = &["reactjs", "nextjs"];
const SOLID: &[&str] = &["solidjs"];
const VUE: &[&str] = &["vuejs"];
const NEST: &[&str] = &["nestjs", "nestjs-prisma"];
const EXPRESS: &[&str] = &["expressjs", "expressjs-prisma"];

pub const FRONTEND_ADDONS: &[AddonDescriptor] = &[
    AddonDescriptor {
        id: "tailwind",
        name: "Tailwind CSS",
        description: "Utility-first CSS framework",
        packages: &[],
        dev_packages: &["tailwindcss", "postcss", "autoprefixer"],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "shadcn",
        name: "Shadcn/UI",
        description: "Reusable UI components",
        packages: &[
            "class-variance-authority",
            "clsx",
            "tailwind-merge",
            "lucide-react",
        ],
        dev_packages: &["tailwindcss", "postcss", "autoprefixer"],
        frameworks: REACT,
    },
    AddonDescriptor {
        id: "tanstack",
        name: "TanStack Query",
        description: "Async data fetching and caching",
        packages: &["@tanstack/react-query"],
        dev_packages: &[],
        frameworks: REACT,
    },
    AddonDescriptor {
        id: "react-hook-form",
        name: "React Hook Form",
        description: "Performant forms",
        packages: &["react-hook-form", "@hookform/resolvers"],
        dev_packages: &[],
        frameworks: REACT,
    },
    AddonDescriptor {
        id: "framer-motion",
        name: "Framer Motion",
        description: "Smooth animations for React",
        packages: &["framer-motion"],
        dev_packages: &[],
        frameworks: REACT,
    },
    AddonDescriptor {
        id: "tanstack-solid",
        name: "TanStack Query",
        description: "Async data fetching for Solid",
        packages: &["@tanstack/solid-query"],
        dev_packages: &[],
        frameworks: SOLID,
    },
    AddonDescriptor {
        id: "motion-solid",
        name: "Motion One",
        description: "Animations for SolidJS",
        packages: &["@motionone/solid"],
        dev_packages: &[],
        frameworks: SOLID,
    },
    AddonDescriptor {
        id: "tanstack-vue",
        name: "TanStack Query",
        description: "Async data fetching for Vue",
        packages: &["@tanstack/vue-query"],
        dev_packages: &[],
        frameworks: VUE,
    },
    AddonDescriptor {
        id: "pinia",
        name: "Pinia",
        description: "Official Vue store",
        packages: &["pinia"],
        dev_packages: &[],
        frameworks: VUE,
    },
    AddonDescriptor {
        id: "vue-use",
        name: "VueUse",
        description: "Composition API utilities",
        packages: &["@vueuse/core"],
        dev_packages: &[],
        frameworks: VUE,
    },
    AddonDescriptor {
        id: "zod",
        name: "Zod",
        description: "TypeScript-first schema validation",
        packages: &["zod"],
        dev_packages: &[],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "axios",
        name: "Axios",
        description: "HTTP client",
        packages: &["axios"],
        dev_packages: &[],
        frameworks: &[],
    },
];

pub const BACKEND_ADDONS: &[AddonDescriptor] = &[
    AddonDescriptor {
        id: "helmet",
        name: "Helmet",
        description: "Security HTTP headers",
        packages: &["helmet"],
        dev_packages: &[],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "bcrypt",
        name: "Bcrypt",
        description: "Password hashing",
        packages: &["bcrypt"],
        dev_packages: &["@types/bcrypt"],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "jsonwebtoken",
        name: "JsonWebToken",
        description: "JWT handling",
        packages: &["jsonwebtoken"],
        dev_packages: &["@types/jsonwebtoken"],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "class-validator",
        name: "Class Validator",
        description: "Decorator-based validation",
        packages: &["class-validator", "class-transformer"],
        dev_packages: &[],
        frameworks: NEST,
    },
    AddonDescriptor {
        id: "swagger",
        name: "Swagger/OpenAPI",
        description: "API documentation (NestJS)",
        packages: &["@nestjs/swagger", "swagger-ui-express"],
        dev_packages: &[],
        frameworks: NEST,
    },
    AddonDescriptor {
        id: "cors",
        name: "CORS",
        description: "Cross-Origin Resource Sharing",
        packages: &["cors"],
        dev_packages: &["@types/cors"],
        frameworks: EXPRESS,
    },
    AddonDescriptor {
        id: "rate-limiter",
        name: "Rate Limiter",
        description: "Request rate limiting",
        packages: &["express-rate-limit"],
        dev_packages: &[],
        frameworks: EXPRESS,
    },
    AddonDescriptor {
        id: "swagger-express",
        name: "Swagger/OpenAPI",
        description: "API documentation (Express)",
        packages: &["swagger-jsdoc", "swagger-ui-express"],
        dev_packages: &["@types/swagger-jsdoc", "@types/swagger-ui-express"],
        frameworks: EXPRESS,
    },
    AddonDescriptor {
        id: "zod",
        name: "Zod",
        description: "Schema validation",
        packages: &["zod"],
        dev_packages: &[],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "compression",
        name: "Compression",
        description: "gzip/deflate responses",
        packages: &["compression"],
        dev_packages: &["@types/compression"],
        frameworks: &[],
    },
    AddonDescriptor {
        id: "dotenv",
        name: "Dotenv",
        description: "Environment variable loading",
        packages: &["dotenv"],
        dev_packages: &[],
        frameworks: &[],
    },
];

pub fn catalog(side: Side) -> &'static [AddonDescriptor] {
    match side {
        Side::Frontend => FRONTEND_ADDONS,
        Side::Backend => BACKEND_ADDONS,
    }
}

pub fn find(side: Side, id: &str) -> Option<&'static AddonDescriptor> {
    catalog(side).iter().find(|addon| addon.id == id)
}

/// Add-ons offered for a framework, in prompt order
pub fn choices(side: Side, framework: &str) -> Vec<&'static AddonDescriptor> {
    catalog(side)
        .iter()
        .filter(|addon| addon.offered_for(framework))
        .collect()
}
