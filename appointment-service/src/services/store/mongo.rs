use async_trait::async_trait;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    options::UpdateOptions,
    Client as MongoClient, Collection,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;

use super::AppointmentStore;
use crate::models::{AppointmentRecord, APPOINTMENTS_COLLECTION, CREATED_AT_FIELD};
use crate::services::credentials::StoreCredentials;

#[derive(Clone)]
pub struct MongoAppointmentStore {
    client: MongoClient,
    appointments: Collection<Document>,
}

impl MongoAppointmentStore {
    /// Build a client from the credential bundle and make sure the server answers.
    pub async fn connect(
        credentials: &StoreCredentials,
        default_database: &str,
    ) -> Result<Self, AppError> {
        let database = credentials.database.as_deref().unwrap_or(default_database);
        tracing::info!(database = %database, "Connecting to MongoDB");

        let client = MongoClient::with_uri_str(credentials.uri.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to create MongoDB client: {}", e);
                AppError::from(e)
            })?;

        let store = Self {
            appointments: client.database(database).collection(APPOINTMENTS_COLLECTION),
            client,
        };

        store.health_check().await?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");

        Ok(store)
    }

    pub fn appointments(&self) -> &Collection<Document> {
        &self.appointments
    }
}

#[async_trait]
impl AppointmentStore for MongoAppointmentStore {
    async fn create(&self, record: &AppointmentRecord) -> Result<String, AppError> {
        let id = ObjectId::new();
        let fields = bson::to_document(record).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to serialize appointment: {}", e))
        })?;

        let mut stamp = Document::new();
        stamp.insert(CREATED_AT_FIELD, true);

        // Upsert on a fresh id is a plain insert that lets the server stamp the creation time.
        let update = doc! {
            "$setOnInsert": fields,
            "$currentDate": stamp,
        };
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .appointments
            .update_one(doc! { "_id": id }, update, options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert appointment: {}", e);
                AppError::from(e)
            })?;

        match result.upserted_id {
            Some(Bson::ObjectId(oid)) => Ok(oid.to_hex()),
            other => Err(AppError::DatabaseError(anyhow::anyhow!(
                "appointment write did not create a document (upserted_id: {:?})",
                other
            ))),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
