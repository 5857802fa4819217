pub mod profile {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod service;
    pub mod handle;
    pub mod route;
}

pub mod catalog {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
}

pub mod friend {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod service;
    pub mod handle;
    pub mod route;
}

pub mod ranking {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod service;
    pub mod handle;
    pub mod route;
}

pub mod notification {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod service;
    pub mod hub;
    pub mod handle;
    pub mod route;
}

pub mod editor;
