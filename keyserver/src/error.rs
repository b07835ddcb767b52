/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use keyserver_lib::errors::KeyserverError;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Responder;
use rocket::Request;
use tracing::error;

#[derive(Debug)]
pub enum ErrorResponse {
    Keyserver(KeyserverError),
    Internal(anyhow::Error),
}

impl ErrorResponse {
    fn status(&self) -> Status {
        match self {
            ErrorResponse::Keyserver(KeyserverError::NotFound(_)) => Status::NotFound,
            ErrorResponse::Keyserver(_) => Status::BadRequest,
            ErrorResponse::Internal(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ErrorResponse {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let message = match self {
            ErrorResponse::Keyserver(e) => {
                error!("ERROR_RESPONSE: {} {}", request.uri(), e);
                e.to_string()
            }
            ErrorResponse::Internal(e) => {
                error!("ERROR_RESPONSE: {} {:#?}", request.uri(), e);
                "Internal server error".to_string()
            }
        };
        Custom(status, message).respond_to(request)
    }
}

impl From<KeyserverError> for ErrorResponse {
    fn from(e: KeyserverError) -> Self {
        ErrorResponse::Keyserver(e)
    }
}

impl From<anyhow::Error> for ErrorResponse {
    fn from(e: anyhow::Error) -> Self {
        ErrorResponse::Internal(e)
    }
}
